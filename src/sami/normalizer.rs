/*!
 * Line-level repair of malformed SAMI markup.
 *
 * Every input line yields exactly one output line. A repaired line may
 * contain an embedded `\n` where the class marker has been split from its
 * payload; the extractor later reads such a line as two physical lines.
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// Cue tag keyword in any case
static SYNC_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<sync").expect("Invalid sync tag regex")
});

/// Any `<P Class=...>` marker, whatever the class name or case
static CLASS_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<p\s+class\s*=").expect("Invalid class marker regex")
});

/// `<Font Face="..."` with no `>` left on the line
static OPEN_FONT_FACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<font\s+face\s*=\s*"([^"]*)"[^>]*$"#).expect("Invalid font face regex")
});

/// A `<P>` or `<P ...>` tag
static PARAGRAPH_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<p(?:\s[^>]*)?>").expect("Invalid paragraph tag regex")
});

/// Canonical spelling of the cue tag
pub const SYNC_TAG: &str = "<SYNC";

/// Rewrites raw SAMI lines into a shape the extractor can read
#[derive(Debug, Clone)]
pub struct Normalizer {
    class_marker: String,
}

impl Normalizer {
    /// Create a normalizer inserting `class_marker` into bare cue lines
    pub fn new(class_marker: impl Into<String>) -> Self {
        Self {
            class_marker: class_marker.into(),
        }
    }

    /// Normalize every line, preserving count and order
    pub fn normalize_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines.iter().map(|line| self.normalize_line(line.as_ref())).collect()
    }

    /// Apply all repairs to a single line
    pub fn normalize_line(&self, line: &str) -> String {
        let mut repaired = self.insert_class_marker(line);
        repaired = close_font_face(&repaired);
        repaired = SYNC_TAG_REGEX.replace_all(&repaired, SYNC_TAG).into_owned();
        let repaired = break_after_paragraph_tags(&repaired);

        if repaired != line {
            trace!("Normalized {:?} -> {:?}", line, repaired);
        }
        repaired
    }

    fn insert_class_marker(&self, line: &str) -> String {
        if !starts_with_sync_tag(line) || CLASS_MARKER_REGEX.is_match(line) {
            return line.to_string();
        }

        match line.find('>') {
            Some(close) => {
                let mut repaired = String::with_capacity(line.len() + self.class_marker.len());
                repaired.push_str(&line[..=close]);
                repaired.push_str(&self.class_marker);
                repaired.push_str(&line[close + 1..]);
                repaired
            }
            None => line.to_string(),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("<P Class=KRCC>")
    }
}

/// True when the trimmed line opens a `<SYNC` tag in any case
pub fn starts_with_sync_tag(line: &str) -> bool {
    line.trim_start()
        .get(..SYNC_TAG.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SYNC_TAG))
}

/// Put a line break after every `<P>` tag that has content behind it
fn break_after_paragraph_tags(line: &str) -> String {
    let mut repaired = String::with_capacity(line.len() + 2);
    let mut copied = 0;

    for tag in PARAGRAPH_TAG_REGEX.find_iter(line) {
        let rest = &line[tag.end()..];
        if rest.is_empty() || rest.starts_with('\n') {
            continue;
        }
        repaired.push_str(&line[copied..tag.end()]);
        repaired.push('\n');
        copied = tag.end();
    }

    repaired.push_str(&line[copied..]);
    repaired
}

/// Close the first unterminated font face attribute right after its quoted value
fn close_font_face(line: &str) -> String {
    let Some(caps) = OPEN_FONT_FACE_REGEX.captures(line) else {
        return line.to_string();
    };
    let Some(value) = caps.get(1) else {
        return line.to_string();
    };

    // value.end() is the closing quote
    let insert_at = value.end() + 1;
    let mut repaired = String::with_capacity(line.len() + 1);
    repaired.push_str(&line[..insert_at]);
    repaired.push('>');
    repaired.push_str(&line[insert_at..]);
    repaired
}
