//! String utility functions for turning submitted text into HTML.

use regex::Regex;
use std::sync::OnceLock;

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
///
/// # Examples
///
/// ```
/// use webform_core::utils::text::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">"), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wraps bare URLs in an already-escaped string with anchor tags.
///
/// Only `http`, `https`, and `ftp` URLs are linked. Escaped ampersands
/// (`&amp;`) are kept inside the URL; any other entity ends it.
pub fn linkify_urls(escaped: &str) -> String {
    static URL: OnceLock<Regex> = OnceLock::new();
    let url = URL.get_or_init(|| {
        Regex::new(r"(?:ftp|https?)://[^\s<&]+(?:&amp;[^\s<&]+)*").unwrap()
    });

    url.replace_all(escaped, r#"<a href="$0" target="_blank" rel="noreferrer noopener">$0</a>"#)
        .into_owned()
}

/// Converts plain text into paragraph markup.
///
/// The text is escaped, every line break becomes `<br/>`, bare URLs become
/// links, and each run of two or more breaks starts a new paragraph.
///
/// # Examples
///
/// ```
/// use webform_core::utils::text::plaintext_to_html;
///
/// assert_eq!(plaintext_to_html("hello\nworld"), "<p>hello<br/>world</p>");
/// assert_eq!(plaintext_to_html("one\n\ntwo"), "<p>one</p><p>two</p>");
/// ```
pub fn plaintext_to_html(s: &str) -> String {
    static BREAK_RUN: OnceLock<Regex> = OnceLock::new();
    let break_run = BREAK_RUN.get_or_init(|| Regex::new(r"(?:<br/>\s*){2,}").unwrap());

    let text = escape_html(s)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br/>");
    let text = linkify_urls(&text);
    let text = break_run.replace_all(&text, "</p><p>");

    format!("<p>{text}</p>")
}
