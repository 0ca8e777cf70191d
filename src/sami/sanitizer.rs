/*!
 * Conversion of accumulated cue markup into plain caption text.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// `<br>` in any case, with optional slash and spacing
static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("Invalid line break regex")
});

const NBSP_ENTITY: &str = "&nbsp;";
const COMMENT_DELIMITERS: [&str; 3] = ["<!--", "<--", "-->"];

/// Turn raw cue markup into plain text
pub fn sanitize_cue_text(raw: &str) -> String {
    // Source line breaks are plain whitespace in SAMI
    let text = raw.replace(['\r', '\n'], " ");
    let mut text = LINE_BREAK_REGEX.replace_all(&text, "\n").into_owned();
    text = text.replace(NBSP_ENTITY, "");
    for delimiter in COMMENT_DELIMITERS {
        text = text.replace(delimiter, "");
    }
    let text = strip_tags(text);
    normalize_whitespace(&text)
}

/// Remove `<...>` spans one at a time; stop at the first `<` that never closes
fn strip_tags(mut text: String) -> String {
    while let Some(open) = text.find('<') {
        let Some(close) = text[open..].find('>').map(|offset| open + offset) else {
            debug!("Unbalanced '<' in cue text, keeping remainder as is");
            break;
        };
        text.replace_range(open..=close, "");
    }
    text
}

/// Collapse runs of spaces, trim every line and drop empty ones
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
