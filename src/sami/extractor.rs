/*!
 * Streaming cue extraction.
 *
 * A state machine pulls physical lines from a cursor with a depth-one
 * lookahead buffer. The cue accumulator reads until it sees the next
 * `<SYNC` (or a terminator) and hands that line back to the cursor
 * instead of consuming it.
 */

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use super::normalizer::starts_with_sync_tag;
use crate::errors::SamiError;

/// Document header marker
pub const HEADER_MARKER: &str = "<SAMI>";

/// `<BODY>` with optional attributes
static BODY_OPEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<body(?:\s[^>]*)?>").expect("Invalid body regex")
});

/// Mandatory `Start` attribute of an opening `<SYNC>` tag
static SYNC_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^<sync\b[^>]*?\bstart\s*=\s*["']?([^\s"'>]*)"#).expect("Invalid sync start regex")
});

const COMMENT_OPENERS: [&str; 2] = ["<!--", "<--"];
const COMMENT_CLOSER: &str = "-->";

/// A cue before sanitizing and end time assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCue {
    /// Start time from the `<SYNC>` tag
    pub start_ms: u64,
    /// Markup accumulated up to the next cue
    pub raw_text: String,
    /// 1-based physical line of the `<SYNC>` tag
    pub line: usize,
}

/// Pull-based line source that can hand back one line
struct LineCursor<I> {
    lines: I,
    lookahead: Option<(usize, String)>,
    consumed: usize,
}

impl<I: Iterator<Item = String>> LineCursor<I> {
    fn new(lines: I) -> Self {
        Self {
            lines,
            lookahead: None,
            consumed: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, String)> {
        if let Some(pending) = self.lookahead.take() {
            return Some(pending);
        }
        let line = self.lines.next()?;
        self.consumed += 1;
        Some((self.consumed, line))
    }

    fn push_back(&mut self, line_no: usize, line: String) {
        debug_assert!(self.lookahead.is_none(), "lookahead buffer holds one line");
        self.lookahead = Some((line_no, line));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExtractState {
    SeekHeader,
    SeekBody,
    ReadingGap,
    /// `head` is whatever followed the `<SYNC>` tag on its own line
    ReadingCue { start_ms: u64, line: usize, head: String },
    Done,
}

/// Extract raw cues from normalized, reordered physical lines
pub fn extract_cues<I>(lines: I) -> Result<Vec<RawCue>, SamiError>
where
    I: IntoIterator<Item = String>,
{
    let mut cursor = LineCursor::new(lines.into_iter());
    let mut cues = Vec::new();
    let mut in_comment = false;
    let mut state = ExtractState::SeekHeader;

    while state != ExtractState::Done {
        state = match state {
            ExtractState::SeekHeader => seek_header(&mut cursor)?,
            ExtractState::SeekBody => seek_body(&mut cursor)?,
            ExtractState::ReadingGap => match cursor.next_line() {
                Some((line_no, line)) => read_gap_line(line_no, &line, &mut in_comment)?,
                None => {
                    debug!("Input ended without </BODY>");
                    ExtractState::Done
                }
            },
            ExtractState::ReadingCue { start_ms, line, head } => {
                let raw_text = accumulate_cue_text(&mut cursor, head);
                trace!("Cue at line {} ({} ms): {:?}", line, start_ms, raw_text);
                cues.push(RawCue {
                    start_ms,
                    raw_text,
                    line,
                });
                ExtractState::ReadingGap
            }
            ExtractState::Done => ExtractState::Done,
        };
    }

    debug!("Extracted {} raw cues", cues.len());
    Ok(cues)
}

fn seek_header<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
) -> Result<ExtractState, SamiError> {
    while let Some((_, line)) = cursor.next_line() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case(HEADER_MARKER) {
            return Ok(ExtractState::SeekBody);
        }
        return Err(SamiError::MissingHeader {
            found: Some(trimmed.to_string()),
        });
    }
    Err(SamiError::MissingHeader { found: None })
}

fn seek_body<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
) -> Result<ExtractState, SamiError> {
    while let Some((line_no, line)) = cursor.next_line() {
        if BODY_OPEN_REGEX.is_match(&line) {
            trace!("Body starts at line {}", line_no);
            return Ok(ExtractState::ReadingGap);
        }
    }
    Err(SamiError::MissingBody)
}

fn read_gap_line(line_no: usize, line: &str, in_comment: &mut bool) -> Result<ExtractState, SamiError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ExtractState::ReadingGap);
    }

    let opens = COMMENT_OPENERS.iter().any(|opener| trimmed.contains(opener));
    let closes = trimmed.contains(COMMENT_CLOSER);

    if *in_comment {
        if closes {
            *in_comment = false;
        }
        return Ok(ExtractState::ReadingGap);
    }
    if opens {
        *in_comment = !closes;
        return Ok(ExtractState::ReadingGap);
    }
    if is_terminator(trimmed) {
        return Ok(ExtractState::Done);
    }
    if starts_with_sync_tag(trimmed) {
        let start_ms = strict_start_time(trimmed, line_no)?;
        let head = trimmed
            .split_once('>')
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();
        return Ok(ExtractState::ReadingCue {
            start_ms,
            line: line_no,
            head,
        });
    }

    debug!("Skipping stray line {} outside any cue: {:?}", line_no, trimmed);
    Ok(ExtractState::ReadingGap)
}

/// Collect the cue payload, leaving the next cue line or terminator unread
fn accumulate_cue_text<I: Iterator<Item = String>>(cursor: &mut LineCursor<I>, head: String) -> String {
    let mut buffer = head;
    while let Some((line_no, line)) = cursor.next_line() {
        let upper = line.to_uppercase();
        if upper.contains("<SYNC") || is_terminator(&upper) {
            cursor.push_back(line_no, line);
            break;
        }
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);
    }
    buffer
}

fn is_terminator(line: &str) -> bool {
    let upper = line.to_ascii_uppercase();
    upper.contains("</BODY>") || upper.contains("</SAMI>")
}

/// Parse the mandatory `Start` attribute of a `<SYNC>` tag
fn strict_start_time(line: &str, line_no: usize) -> Result<u64, SamiError> {
    let Some(value) = SYNC_START_REGEX.captures(line).and_then(|caps| caps.get(1)) else {
        return Err(SamiError::InvalidTimestamp {
            line: line_no,
            value: line.to_string(),
        });
    };

    value.as_str().parse().map_err(|_| SamiError::InvalidTimestamp {
        line: line_no,
        value: value.as_str().to_string(),
    })
}
