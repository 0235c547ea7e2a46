use crate::nodes::NodeKind;

/// Org-style `#+BEGIN_<TOKEN>` ... `#+END_<TOKEN>` regions.
pub struct BeginEnd;

impl BeginEnd {
    pub const OPEN: &'static str = "#+BEGIN_";
    pub const CLOSE: &'static str = "#+END_";
    pub const QUERY: &'static str = "QUERY";

    /// The token of an opening line. The token runs to the first whitespace
    /// and nothing else may follow it.
    pub fn open(rest: &str) -> Option<String> {
        let tail = rest.strip_prefix(Self::OPEN)?;
        let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (token, after) = tail.split_at(end);
        (!token.is_empty() && after.trim().is_empty()).then(|| token.to_string())
    }

    pub fn closes(token: &str, rest: &str) -> bool {
        rest.strip_prefix(Self::CLOSE)
            .and_then(|tail| tail.strip_prefix(token))
            .is_some_and(|after| after.trim().is_empty())
    }

    /// Node for a finished region. `QUERY` regions become query commands.
    pub fn node(token: &str, value: String) -> NodeKind {
        if token == Self::QUERY {
            NodeKind::QueryCommand { query: value }
        } else {
            NodeKind::AdvancedCommand {
                variant: token.to_string(),
                value,
            }
        }
    }
}
