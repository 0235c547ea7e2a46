//! Page title to file name mapping.
//!
//! Titles are stored with the `:triple-lowbar` scheme: namespace slashes
//! become `___`, characters that are not portable in file names are
//! percent-encoded and Windows device names get a trailing separator.

use std::sync::LazyLock;

use logseq_config::FilenameFormat;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

static URL_ENCODED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%[0-9a-f]{2}").expect("valid regex"));
static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[:\\*?"<>|#]+"#).expect("valid regex"));

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// File name, without extension, for a page title.
pub fn title_to_filename(format: FilenameFormat, title: &str) -> String {
    match format {
        FilenameFormat::TripleLowbar => triple_lowbar_name(title),
    }
}

/// Page title for a file name without extension.
pub fn filename_to_title(format: FilenameFormat, filename: &str) -> String {
    match format {
        FilenameFormat::TripleLowbar => triple_lowbar_title(filename),
    }
}

fn triple_lowbar_name(title: &str) -> String {
    let title = title.strip_prefix('/').unwrap_or(title);
    let title = title.strip_suffix('/').unwrap_or(title);
    let title: String = title.nfc().collect();

    // Existing escapes must survive the decode on the way back.
    let title = URL_ENCODED.replace_all(&title, |c: &Captures| c[0].replacen('%', "%25", 1));
    let mut name = RESERVED_CHARS
        .replace_all(&title, |c: &Captures| urlencoding::encode(&c[0]).into_owned())
        .into_owned();

    if WINDOWS_RESERVED.contains(&name.as_str()) || name.ends_with('.') {
        name.push('/');
    }

    name.replace("___", "%5F%5F%5F")
        .replace("_/", "%5F/")
        .replace("/_", "/%5F")
        .replace('/', "___")
}

fn triple_lowbar_title(filename: &str) -> String {
    let title = filename
        .replace("___", "/")
        .replace("%5F%5F%5F", "___")
        .replace("%5F/", "_/")
        .replace("/%5F", "/_");
    let title = title.strip_suffix('/').unwrap_or(&title);

    let title = URL_ENCODED.replace_all(title, |c: &Captures| match urlencoding::decode(&c[0]) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => c[0].to_string(),
    });
    title.nfc().collect()
}
