use crate::nodes::NodeKind;

/// Logseq macro invocation: `{{name arg1, arg2}}` or `{{{name ...}}}`.
///
/// Arguments are comma separated and trimmed. An argument starting with a
/// double quote runs to the next unescaped quote, may hold commas, and has
/// its backslashes removed. Empty arguments make the whole macro invalid, as
/// does anything but whitespace between a closing quote and the next comma.
pub struct Macro;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall {
    pub name: String,
    pub arguments: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Name,
    ArgumentStart,
    NonQuoted,
    Quoted,
    ExpectComma,
}

impl Macro {
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
    pub const QUOTE: u8 = b'"';
    pub const SEPARATOR: u8 = b',';

    /// Scans a macro at the start of `line`, which must not span lines.
    ///
    /// Returns the call and the number of bytes consumed.
    pub fn scan(line: &str) -> Option<(MacroCall, usize)> {
        let b = line.as_bytes();
        if !b.starts_with(Self::OPEN) {
            return None;
        }
        let triple = b.get(2) == Some(&b'{');
        let mut start = if triple { 3 } else { 2 };

        let mut state = State::Name;
        let mut name = "";
        let mut arguments = Vec::new();
        let mut end = None;

        let mut i = start;
        while i + 1 < b.len() {
            let closes =
                b[i..].starts_with(Self::CLOSE) && (!triple || b.get(i + 2) == Some(&b'}'));
            if closes && b[i - 1] != b'\\' {
                match state {
                    State::Name => name = &line[start..i],
                    State::ArgumentStart | State::NonQuoted | State::Quoted => {
                        let value = line[start..i].trim();
                        if value.is_empty() {
                            return None;
                        }
                        arguments.push(value.to_string());
                    }
                    State::ExpectComma => {}
                }
                end = Some(if triple { i + 3 } else { i + 2 });
                break;
            }

            match state {
                State::Name => {
                    if b[i] == b' ' {
                        name = &line[start..i];
                        state = State::ArgumentStart;
                        start = i + 1;
                    }
                }
                State::ArgumentStart => {
                    if b[i] == Self::QUOTE {
                        state = State::Quoted;
                        start = i;
                    } else if b[i] == Self::SEPARATOR {
                        return None;
                    } else if !b[i].is_ascii_whitespace() {
                        state = State::NonQuoted;
                        start = i;
                    }
                }
                State::Quoted => {
                    if b[i] == Self::QUOTE && b[i - 1] != b'\\' {
                        arguments.push(line[start + 1..i].replace('\\', ""));
                        state = State::ExpectComma;
                        start = i + 1;
                    }
                }
                State::NonQuoted => {
                    if b[i] == Self::SEPARATOR {
                        let value = line[start..i].trim();
                        if value.is_empty() {
                            return None;
                        }
                        arguments.push(value.to_string());
                        state = State::ArgumentStart;
                        start = i + 1;
                    }
                }
                State::ExpectComma => {
                    if b[i] == Self::SEPARATOR {
                        state = State::ArgumentStart;
                        start = i + 1;
                    } else if !b[i].is_ascii_whitespace() {
                        return None;
                    }
                }
            }
            i += 1;
        }

        let end = end?;
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return None;
        }
        Some((
            MacroCall {
                name: name.to_string(),
                arguments,
            },
            end,
        ))
    }
}

impl MacroCall {
    /// Turns the call into its node, specialising the macros that have
    /// dedicated kinds: `query`, `embed` and `cloze`.
    pub fn into_node(self) -> NodeKind {
        match self.name.as_str() {
            "query" if !self.arguments.is_empty() => NodeKind::Query {
                query: self.arguments.join(", "),
            },
            "embed" => match self.arguments.first().map(String::as_str) {
                Some(arg) if arg.len() >= 4 && arg.starts_with("((") && arg.ends_with("))") => {
                    NodeKind::BlockEmbed {
                        id: arg[2..arg.len() - 2].to_string(),
                    }
                }
                Some(arg) if arg.len() >= 4 && arg.starts_with("[[") && arg.ends_with("]]") => {
                    NodeKind::PageEmbed {
                        to: arg[2..arg.len() - 2].to_string(),
                    }
                }
                _ => self.into_macro(),
            },
            "cloze" if !self.arguments.is_empty() => cloze(&self.arguments.join(", ")),
            _ => self.into_macro(),
        }
    }

    fn into_macro(self) -> NodeKind {
        NodeKind::Macro {
            name: self.name,
            arguments: self.arguments,
        }
    }
}

/// `answer \\ cue`: the cue follows the run of backslashes.
fn cloze(text: &str) -> NodeKind {
    match text.find('\\') {
        Some(idx) => {
            let cue = text[idx..].trim_start_matches('\\');
            NodeKind::Cloze {
                answer: text[..idx].trim().to_string(),
                cue: cue.trim().to_string(),
            }
        }
        None => NodeKind::Cloze {
            answer: text.trim().to_string(),
            cue: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn call(name: &str, arguments: &[&str]) -> MacroCall {
        MacroCall {
            name: name.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[rstest]
    #[case("{{poem}}", call("poem", &[]), 8)]
    #[case("{{poem red}}", call("poem", &["red"]), 12)]
    #[case("{{poem red, blue}} tail", call("poem", &["red", "blue"]), 18)]
    #[case("{{poem red,blue}}", call("poem", &["red", "blue"]), 17)]
    #[case("{{poem red blue}}", call("poem", &["red blue"]), 17)]
    #[case("{{poem \"red\", \"blue\"}}", call("poem", &["red", "blue"]), 22)]
    #[case("{{poem \"blue,\" , red}}", call("poem", &["blue,", "red"]), 22)]
    #[case("{{poem red,\",blue\"}}", call("poem", &["red", ",blue"]), 20)]
    #[case("{{poem \"r\\ed\",blue}}", call("poem", &["red", "blue"]), 20)]
    #[case("{{{poem red}}}", call("poem", &["red"]), 14)]
    #[case("{{poem a\\}}b}}", call("poem", &["a\\}}b"]), 14)]
    fn scans_valid_macros(#[case] input: &str, #[case] expected: MacroCall, #[case] len: usize) {
        assert_eq!(Macro::scan(input), Some((expected, len)));
    }

    #[rstest]
    #[case("{{poem red blue")]
    #[case("{{poem red,}}")]
    #[case("{{poem red,,}}")]
    #[case("{{poem \"blue,\" red}}")]
    #[case("{{poem }}")]
    #[case("{{}}")]
    #[case("{{po\tem}}")]
    #[case("{{{poem}}")]
    #[case("{poem}")]
    fn rejects_invalid_macros(#[case] input: &str) {
        assert_eq!(Macro::scan(input), None);
    }

    #[rstest]
    #[case(call("query", &["(todo now)"]), NodeKind::Query { query: "(todo now)".into() })]
    #[case(call("query", &["a", "b"]), NodeKind::Query { query: "a, b".into() })]
    #[case(call("embed", &["[[Page]]"]), NodeKind::PageEmbed { to: "Page".into() })]
    #[case(call("embed", &["((64a1-ff))"]), NodeKind::BlockEmbed { id: "64a1-ff".into() })]
    #[case(call("cloze", &["answer"]), NodeKind::Cloze { answer: "answer".into(), cue: "".into() })]
    #[case(
        call("cloze", &["answer \\\\ cue"]),
        NodeKind::Cloze { answer: "answer".into(), cue: "cue".into() }
    )]
    #[case(
        call("embed", &["Page"]),
        NodeKind::Macro { name: "embed".into(), arguments: vec!["Page".into()] }
    )]
    #[case(call("query", &[]), NodeKind::Macro { name: "query".into(), arguments: vec![] })]
    fn specialises_known_macros(#[case] input: MacroCall, #[case] expected: NodeKind) {
        assert_eq!(input.into_node(), expected);
    }
}
