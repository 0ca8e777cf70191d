/*!
 * # smisub - SAMI subtitle recovery and conversion
 *
 * A Rust library for ingesting legacy SAMI (`.smi`) subtitle files and
 * turning them into clean, time-ordered caption entries.
 *
 * ## Features
 *
 * - Character encoding detection for files that declare none
 * - Repair of malformed markup:
 *   - inconsistent `<SYNC>` casing
 *   - missing `<P Class=...>` markers
 *   - unterminated `<Font Face="...">` tags
 * - Chronological reordering of out-of-order cues
 * - Comment-aware streaming cue extraction
 * - End time inference and duplicate removal
 * - SRT output
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `sami`: The ingestion pipeline:
 *   - `sami::normalizer`: Line-level markup repair
 *   - `sami::reorder`: Timestamp-driven cue reordering
 *   - `sami::extractor`: Streaming cue extraction
 *   - `sami::sanitizer`: Markup removal
 *   - `sami::finalizer`: End times and deduplication
 * - `encoding`: Character encoding detection
 * - `subtitle_processor`: Subtitle entries, collections and SRT output
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod encoding;
pub mod errors;
pub mod file_utils;
pub mod sami;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, SamiError, SubtitleError};
pub use sami::{SamiParser, SubtitleParser};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
