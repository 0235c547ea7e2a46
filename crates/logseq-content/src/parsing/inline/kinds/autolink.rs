use std::sync::LazyLock;

use regex::Regex;

/// Autolinks: `<scheme:...>`, `<user@example.com>` and bare
/// `http://`, `https://` or `ftp://` URLs found in running text.
pub struct AutoLink;

static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>").expect("valid regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("valid regex")
});

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:http|https|ftp)://[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-z]+(?::\d+)?(?:[/#?][-a-zA-Z0-9@:%_+.~#$!?&/=\(\);,'">\^{}\[\]`]*)?"#,
    )
    .expect("valid regex")
});

impl AutoLink {
    pub const OPEN: u8 = b'<';
    pub const SCHEMES: [&'static str; 3] = ["http://", "https://", "ftp://"];

    /// Scans a bracketed autolink at the start of `s`, returning the URL and
    /// the number of bytes consumed.
    pub fn scan(s: &str) -> Option<(String, usize)> {
        let caps = URI.captures(s).or_else(|| EMAIL.captures(s))?;
        let whole = caps.get(0)?;
        let url = caps.get(1)?;
        Some((url.as_str().to_string(), whole.end()))
    }

    /// Whether a bare URL may start at the beginning of `s`.
    pub fn starts_bare(s: &str) -> bool {
        Self::SCHEMES.iter().any(|scheme| s.starts_with(scheme))
    }
}

/// Length of the bare URL at the start of `s`, if there is one.
///
/// Trailing punctuation that usually ends a sentence is not part of the
/// URL, and neither is a closing parenthesis without a matching opening one
/// inside the URL or a trailing `&name;` entity.
pub fn bare_url_extent(s: &str) -> Option<usize> {
    let url = BARE_URL.find(s)?.as_str();
    let mut end = url.len();
    while let Some(&last) = url.as_bytes()[..end].last() {
        match last {
            b'?' | b'!' | b'.' | b',' | b':' | b'*' | b'_' | b'~' => end -= 1,
            b')' => {
                let candidate = &url[..end];
                if candidate.matches(')').count() > candidate.matches('(').count() {
                    end -= 1;
                } else {
                    break;
                }
            }
            b';' => match entity_start(&url[..end]) {
                Some(start) => end = start,
                None => break,
            },
            _ => break,
        }
    }
    Some(end)
}

/// Start of a trailing `&name;` entity reference.
fn entity_start(s: &str) -> Option<usize> {
    let body = s.strip_suffix(';')?;
    let name_len = body
        .bytes()
        .rev()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    let amp = body.len().checked_sub(name_len + 1)?;
    (name_len > 0 && body.as_bytes()[amp] == b'&').then_some(amp)
}
