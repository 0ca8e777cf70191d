/*!
 * Chronological reordering of cue lines.
 *
 * Only the lines that open a cue move. Each one keeps its slot in the
 * document but the slots are refilled in timestamp order, so headers,
 * comments and payload-only lines never shift.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::normalizer::starts_with_sync_tag;

/// Lenient start time lookup inside the opening `<SYNC` tag; anything
/// unparsable sorts as 0. Accepts the same quoting as the extractor.
static START_ATTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*<sync\b[^>]*?\bstart\s*=\s*["']?(\d+)"#).expect("Invalid start attribute regex")
});

/// A cue-opening line paired with its sort key
#[derive(Debug, Clone, PartialEq, Eq)]
struct TimedLine {
    start_ms: u64,
    content: String,
}

/// Extract the `Start=` value of a cue line, defaulting to 0
pub fn lenient_start_time(line: &str) -> u64 {
    START_ATTR_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Sort cue-opening lines by start time while keeping every other line in place
pub fn reorder_cue_lines(lines: Vec<String>) -> Vec<String> {
    let mut timed: Vec<TimedLine> = lines
        .iter()
        .filter(|line| starts_with_sync_tag(line))
        .map(|line| TimedLine {
            start_ms: lenient_start_time(line),
            content: line.clone(),
        })
        .collect();

    if timed.windows(2).all(|pair| pair[0].start_ms <= pair[1].start_ms) {
        return lines;
    }

    debug!("Reordering {} out-of-order cue lines", timed.len());
    // sort_by_key is stable, equal timestamps keep source order
    timed.sort_by_key(|line| line.start_ms);
    let mut sorted = timed.into_iter();

    lines
        .into_iter()
        .map(|line| {
            if starts_with_sync_tag(&line) {
                sorted.next().map_or(line, |timed| timed.content)
            } else {
                line
            }
        })
        .collect()
}
