/*!
 * SAMI (`.smi`) ingestion pipeline.
 *
 * Real SAMI files are rarely well formed. Parsing runs in five stages:
 * - `normalizer`: line-level markup repair
 * - `reorder`: chronological reordering of cue lines
 * - `extractor`: streaming cue extraction
 * - `sanitizer`: markup removal from cue text
 * - `finalizer`: end times and duplicate removal
 *
 * The encoding is detected once from the original bytes and the whole
 * pipeline runs on an in-memory line buffer. Repaired lines are written
 * back to disk only when in-place repair is enabled.
 */

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, info};

use crate::app_config::SamiConfig;
use crate::encoding::{decode_lines, encode_lines, resolve_label, ChardetDetector, EncodingDetector, FixedEncoding};
use crate::errors::{SamiError, SubtitleError};
use crate::subtitle_processor::SubtitleEntry;

pub mod extractor;
pub mod finalizer;
pub mod normalizer;
pub mod reorder;
pub mod sanitizer;

pub use extractor::{extract_cues, RawCue};
pub use finalizer::{finalize_cues, DEFAULT_LAST_CUE_DURATION_MS};
pub use normalizer::Normalizer;
pub use reorder::reorder_cue_lines;
pub use sanitizer::sanitize_cue_text;

/// A format-specific subtitle reader
pub trait SubtitleParser {
    /// File extension this parser handles, including the dot
    fn file_extension(&self) -> &str;

    /// Parse the file at `path` into finalized entries
    fn parse_format(&self, path: &Path) -> Result<Vec<SubtitleEntry>, SubtitleError>;
}

/// Result of parsing a SAMI file
#[derive(Debug)]
pub struct ParsedSami {
    /// Finalized entries in start time order
    pub entries: Vec<SubtitleEntry>,
    /// Encoding the file was decoded with
    pub encoding: &'static Encoding,
    /// Whether repaired lines were written back to the file
    pub repaired_on_disk: bool,
}

/// Repairs and parses SAMI subtitle files
pub struct SamiParser {
    normalizer: Normalizer,
    detector: Box<dyn EncodingDetector>,
    last_cue_duration_ms: u64,
    repair_in_place: bool,
}

impl SamiParser {
    /// Parser with default marker, duration and encoding detection
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::default(),
            detector: Box::new(ChardetDetector::new()),
            last_cue_duration_ms: DEFAULT_LAST_CUE_DURATION_MS,
            repair_in_place: false,
        }
    }

    /// Build a parser from configuration
    pub fn from_config(config: &SamiConfig) -> Result<Self, SubtitleError> {
        let detector: Box<dyn EncodingDetector> = match &config.forced_encoding {
            Some(label) => {
                let encoding = resolve_label(label)
                    .ok_or_else(|| SubtitleError::UnknownEncoding(label.clone()))?;
                Box::new(FixedEncoding(encoding))
            }
            None => match &config.encoding_hint_tld {
                Some(tld) => Box::new(ChardetDetector::with_tld_hint(tld.as_str())),
                None => Box::new(ChardetDetector::new()),
            },
        };

        Ok(Self {
            normalizer: Normalizer::new(config.class_marker.clone()),
            detector,
            last_cue_duration_ms: config.last_cue_duration_ms,
            repair_in_place: config.repair_in_place,
        })
    }

    /// Replace the encoding detector
    pub fn with_detector<D: EncodingDetector + 'static>(mut self, detector: D) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Enable or disable writing repaired lines back to the source file
    pub fn with_repair_in_place(mut self, enabled: bool) -> Self {
        self.repair_in_place = enabled;
        self
    }

    /// Normalize and reorder raw lines without extracting anything
    pub fn repair_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        reorder_cue_lines(self.normalizer.normalize_lines(lines))
    }

    /// Run the full pipeline on already decoded lines
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<SubtitleEntry>, SamiError> {
        let repaired = self.repair_lines(lines);
        self.extract_entries(&repaired)
    }

    /// Detect the encoding of `bytes`, decode and parse
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedSami, SamiError> {
        let encoding = self.detector.detect(bytes);
        let lines = decode_lines(bytes, encoding);
        let entries = self.parse_lines(&lines)?;
        Ok(ParsedSami {
            entries,
            encoding,
            repaired_on_disk: false,
        })
    }

    /// Parse a SAMI file, optionally persisting the repaired lines first
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedSami, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let encoding = self.detector.detect(&bytes);
        debug!("Reading {:?} as {}", path, encoding.name());

        let lines = decode_lines(&bytes, encoding);
        let repaired = self.repair_lines(&lines);

        let mut repaired_on_disk = false;
        if self.repair_in_place && repaired != lines {
            fs::write(path, encode_lines(&repaired, encoding))?;
            info!("Repaired SAMI markup written back to {:?}", path);
            repaired_on_disk = true;
        }

        let entries = self.extract_entries(&repaired)?;
        Ok(ParsedSami {
            entries,
            encoding,
            repaired_on_disk,
        })
    }

    /// Parse a file, returning `None` on any failure
    pub fn try_parse<P: AsRef<Path>>(&self, path: P) -> Option<Vec<SubtitleEntry>> {
        let path = path.as_ref();
        match self.parse_file(path) {
            Ok(parsed) => Some(parsed.entries),
            Err(e) => {
                debug!("Not parsed as SAMI: {:?}: {}", path, e);
                None
            }
        }
    }

    fn extract_entries(&self, repaired: &[String]) -> Result<Vec<SubtitleEntry>, SamiError> {
        // Repaired lines may hold an embedded break after the class marker
        let physical = repaired
            .iter()
            .flat_map(|line| line.split('\n'))
            .map(|line| line.trim_end_matches('\r').to_string());

        let cues = extract_cues(physical)?;
        let sanitized = cues
            .into_iter()
            .map(|cue| (cue.start_ms, sanitize_cue_text(&cue.raw_text)));

        Ok(finalize_cues(sanitized, self.last_cue_duration_ms))
    }
}

impl Default for SamiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtitleParser for SamiParser {
    fn file_extension(&self) -> &str {
        ".smi"
    }

    fn parse_format(&self, path: &Path) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        self.parse_file(path).map(|parsed| parsed.entries)
    }
}
