use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::config::Config;
use super::converter::Converter;
use super::error::ProcessorError;
use super::json_writer::JsonWriter;

const CH_EXTENSION: &str = "ch";

/// Find the acquisitions under the configured input path.
///
/// The input is either a single .ch file, an acquisition folder holding the configured
/// .ch file, or a directory whose sub-folders are acquisition folders.
pub fn find_acquisitions(config: &Config) -> Result<Vec<PathBuf>, ProcessorError> {
    let input = &config.input_path;
    if input.is_file() {
        let is_ch = input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CH_EXTENSION));
        return if is_ch {
            Ok(vec![input.clone()])
        } else {
            Err(ProcessorError::NoAcquisitions(input.clone()))
        };
    }
    if input.join(&config.ch_file_name).exists() {
        return Ok(vec![input.clone()]);
    }

    let mut acquisitions = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_dir() && path.join(&config.ch_file_name).exists() {
            acquisitions.push(path);
        } else {
            log::debug!("Skipping {}", path.to_string_lossy());
        }
    }
    acquisitions.sort();

    if acquisitions.is_empty() {
        return Err(ProcessorError::NoAcquisitions(input.clone()));
    }
    Ok(acquisitions)
}

/// Convert one acquisition and write its json file, returning the bytes written
pub fn process_acquisition(
    config: &Config,
    converter: &Converter,
    acquisition: &Path,
) -> Result<u64, ProcessorError> {
    let document = if config.binary_only || acquisition.is_file() {
        converter.convert_ch_file(acquisition)
    } else {
        converter.convert_folder(acquisition)
    }
    .map_err(|source| ProcessorError::ConverterError {
        path: acquisition.to_path_buf(),
        source,
    })?;

    let json_path = config.get_json_file_name(acquisition)?;
    let mut writer = JsonWriter::new(&json_path)?;
    writer.write_document(&document)?;
    Ok(writer.close()?)
}

/// The main loop of chemstation_converter.
///
/// This takes in a config (and progress monitor) and converts every acquisition found
/// under the input path. The first failure stops the batch.
pub fn process(config: Config, progress: Arc<Mutex<f32>>) -> Result<(), ProcessorError> {
    let converter = Converter::new(&config).map_err(|source| ProcessorError::ConverterError {
        path: config.input_path.clone(),
        source,
    })?;
    let acquisitions = find_acquisitions(&config)?;
    log::info!(
        "Found {} acquisition(s) in {}",
        acquisitions.len(),
        config.input_path.to_string_lossy()
    );

    let mut total_bytes: u64 = 0;
    for (idx, acquisition) in acquisitions.iter().enumerate() {
        log::info!("Processing {}...", acquisition.to_string_lossy());
        total_bytes += process_acquisition(&config, &converter, acquisition)?;
        if let Ok(mut bar) = progress.lock() {
            *bar = (idx + 1) as f32 / acquisitions.len() as f32;
        }
    }
    log::info!(
        "Finished {} acquisition(s), {} written.",
        acquisitions.len(),
        human_bytes::human_bytes(total_bytes as f64)
    );
    Ok(())
}
