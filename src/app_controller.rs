use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::{FileManager, SAMI_EXTENSIONS};
use crate::sami::SamiParser;
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for SAMI conversion

/// Name of the per-folder failure log
pub const ISSUES_LOG_FILE: &str = "smisub.issues.log";

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Output written with this many entries
    Converted { output: PathBuf, entries: usize },
    /// Output already existed and overwrite was not forced
    Skipped { output: PathBuf },
}

/// Counters for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Parser built from the SAMI section of the config
    parser: SamiParser,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let parser = SamiParser::from_config(&config.sami)
            .context("Failed to build SAMI parser from configuration")?;

        Ok(Self { config, parser })
    }

    /// Access the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert one SAMI file into the configured output format
    pub fn convert_file(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<ConversionOutcome, AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let output_path =
            FileManager::generate_output_path(input_file, output_dir, &self.config.output.extension);
        if output_path == input_file {
            return Err(AppError::Config(format!(
                "Output would overwrite the input file: {:?}",
                input_file
            )));
        }
        if output_path.exists() && !(force_overwrite || self.config.output.force_overwrite) {
            warn!("Skipping file, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(ConversionOutcome::Skipped { output: output_path });
        }

        let collection = SubtitleCollection::from_sami_file(input_file, &self.parser)?;
        debug!("{}", collection);
        let collection = collection.without_blank_entries();

        FileManager::ensure_dir(output_dir)?;
        collection
            .write_to_srt(&output_path)
            .map_err(|e| AppError::File(e.to_string()))?;

        Ok(ConversionOutcome::Converted {
            output: output_path,
            entries: collection.entries.len(),
        })
    }

    /// Run the conversion for a single file
    pub fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        match self.convert_file(&input_file, &output_dir, force_overwrite)? {
            ConversionOutcome::Converted { output, entries } => {
                info!(
                    "Converted {} entries to {:?} in {:.2}s",
                    entries,
                    output,
                    start_time.elapsed().as_secs_f64()
                );
            }
            ConversionOutcome::Skipped { .. } => {}
        }

        Ok(())
    }

    /// Convert every SAMI file below `input_dir`
    ///
    /// Outputs go next to each input unless `output_dir` is given. Failures
    /// are logged and appended to the folder's issues log; they do not stop
    /// the run.
    pub fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let sami_files = FileManager::find_files(&input_dir, &SAMI_EXTENSIONS)?;
        if sami_files.is_empty() {
            return Err(anyhow!("No SAMI files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(sami_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let log_file_path = input_dir.join(ISSUES_LOG_FILE);
        let mut summary = FolderSummary::default();

        for sami_file in &sami_files {
            let file_name = sami_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match (&output_dir, sami_file.parent()) {
                (Some(dir), _) => dir.clone(),
                (None, Some(parent)) => parent.to_path_buf(),
                (None, None) => input_dir.clone(),
            };

            match self.convert_file(sami_file, &target_dir, force_overwrite) {
                Ok(ConversionOutcome::Converted { .. }) => summary.converted += 1,
                Ok(ConversionOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    let entry = format!("{}: {}", sami_file.display(), e);
                    if let Err(log_err) = FileManager::append_to_log_file(&log_file_path, &entry) {
                        warn!("Failed to write issues log: {}", log_err);
                    }
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} converted, {} skipped, {} errors",
            summary.converted, summary.skipped, summary.failed
        );

        Ok(summary)
    }
}
