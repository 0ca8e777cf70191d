/*!
 * End time inference and duplicate removal.
 */

use log::debug;

use crate::subtitle_processor::{remove_duplicate_entries, SubtitleEntry};

/// Duration given to the final cue when nothing follows it
pub const DEFAULT_LAST_CUE_DURATION_MS: u64 = 1000;

/// Build entries from sanitized cues, infer end times and drop duplicates
pub fn finalize_cues<I>(cues: I, last_cue_duration_ms: u64) -> Vec<SubtitleEntry>
where
    I: IntoIterator<Item = (u64, String)>,
{
    let mut entries: Vec<SubtitleEntry> = cues
        .into_iter()
        .enumerate()
        .map(|(i, (start_ms, text))| SubtitleEntry::new(i + 1, start_ms, start_ms, text))
        .collect();

    assign_end_times(&mut entries, last_cue_duration_ms);

    let before = entries.len();
    let entries = remove_duplicate_entries(entries);
    if entries.len() != before {
        debug!("Removed {} duplicate entries", before - entries.len());
    }
    entries
}

/// Each entry ends where the next one starts; the last one gets a fixed duration
pub fn assign_end_times(entries: &mut [SubtitleEntry], last_cue_duration_ms: u64) {
    let next_starts: Vec<Option<u64>> = entries
        .iter()
        .skip(1)
        .map(|entry| Some(entry.start_time_ms))
        .chain(std::iter::once(None))
        .collect();

    for (entry, next_start) in entries.iter_mut().zip(next_starts) {
        entry.end_time_ms = next_start
            .unwrap_or_else(|| entry.start_time_ms.saturating_add(last_cue_duration_ms));
    }
}
