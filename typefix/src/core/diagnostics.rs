//! Extraction of missing-package references from validation output.

use std::sync::LazyLock;

use regex::Regex;

static MISSING_MODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Cannot find module '(.+?)' or its corresponding type declarations\.|Could not find a declaration file for module '(.+?)'\.",
    )
    .expect("missing module regex")
});

/// Return the package named by a missing-module diagnostic on `line`, if any.
///
/// The captured name is returned verbatim (no trimming or scope handling).
pub fn missing_package(line: &str) -> Option<&str> {
    let captures = MISSING_MODULE_RE.captures(line)?;
    captures
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|name| !name.is_empty())
}

/// Line boundaries: `\n`, `\r` (alone or in `\r\n`), and the Unicode line and
/// record separators. Tools redrawing progress output end lines with a bare `\r`.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Collect missing package names from every line of `text`, in line order.
///
/// Duplicates are kept; resolving the same package twice is harmless.
pub fn missing_packages(text: &str) -> Vec<String> {
    text.split(LINE_BREAKS)
        .filter(|line| !line.is_empty())
        .filter_map(missing_package)
        .map(str::to_string)
        .collect()
}
