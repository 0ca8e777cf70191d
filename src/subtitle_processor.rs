use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::sami::SamiParser;

// @module: Subtitle entries and collections

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Remove entries repeating an earlier `(start time, text)` pair.
///
/// Survivors keep their relative order and the result is renumbered from 1.
/// When the kept entry just before a dropped duplicate ends where the
/// duplicate starts, it takes over the duplicate's end time, so a chain of
/// `end == next start` stays unbroken.
pub fn remove_duplicate_entries(entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
    let mut seen: HashSet<(u64, String)> = HashSet::with_capacity(entries.len());
    let mut unique: Vec<SubtitleEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert((entry.start_time_ms, entry.text.clone())) {
            unique.push(entry);
            continue;
        }

        if let Some(previous) = unique.last_mut() {
            if previous.end_time_ms == entry.start_time_ms && entry.end_time_ms > previous.end_time_ms {
                previous.end_time_ms = entry.end_time_ms;
            }
        }
    }

    for (i, entry) in unique.iter_mut().enumerate() {
        entry.seq_num = i + 1;
    }
    unique
}

/// Collection of subtitle entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,

    /// Name of the encoding the source was decoded with
    pub source_encoding: String,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf, source_encoding: String) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            source_encoding,
        }
    }

    /// Parse a SAMI file into a collection
    pub fn from_sami_file<P: AsRef<Path>>(path: P, parser: &SamiParser) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let parsed = parser.parse_file(path)?;

        if parsed.entries.is_empty() {
            warn!("No subtitle entries found in {:?}", path);
        }

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries: parsed.entries,
            source_encoding: parsed.encoding.name().to_string(),
        })
    }

    /// Drop entries whose text is empty (SAMI clears the screen with `&nbsp;` cues)
    pub fn without_blank_entries(mut self) -> Self {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.text.trim().is_empty());

        if self.entries.len() != before {
            debug!("Dropped {} blank entries", before - self.entries.len());
            for (i, entry) in self.entries.iter_mut().enumerate() {
                entry.seq_num = i + 1;
            }
        }
        self
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Encoding: {}", self.source_encoding)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
