use std::path::{Path, PathBuf};

use super::ch_file::ChFile;
use super::column_info::ColumnInfo;
use super::config::Config;
use super::date_time::DateTimeNormalizer;
use super::document::{
    ChromatogramDataCube, DeviceSystem, GasChromatography, Injection, Measurement, Sample,
    UnifiedDocument, VolumeSetting,
};
use super::error::ConverterError;
use super::reconcile::{reconcile, reconcile_observed, MergeStrategy};
use super::xml_result::XmlResult;

const FLAME_IONIZATION: &str = "Flame Ionization";
const UNKNOWN_DETECTOR: &str = "Unknown";

/// Map the detector name of Result.xml to a detector family
pub fn detector_type(detector: &str) -> &'static str {
    if detector.to_lowercase().contains("fid") {
        FLAME_IONIZATION
    } else {
        UNKNOWN_DETECTOR
    }
}

/// Builds a UnifiedDocument from a ChemStation acquisition.
///
/// The Converter holds no state besides its settings and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Converter {
    normalizer: DateTimeNormalizer,
    ch_file_name: String,
    xml_file_name: String,
    txt_file_name: String,
    merge_strategy: MergeStrategy,
}

impl Converter {
    pub fn new(config: &Config) -> Result<Self, ConverterError> {
        Ok(Self {
            normalizer: config.get_date_time_normalizer()?,
            ch_file_name: config.ch_file_name.clone(),
            xml_file_name: config.xml_file_name.clone(),
            txt_file_name: config.txt_file_name.clone(),
            merge_strategy: config.merge_strategy,
        })
    }

    /// Convert an acquisition folder using the .ch file, Result.xml and acq.txt.
    ///
    /// Fields seen in both the .ch file and the other files are merged with the
    /// configured MergeStrategy.
    pub fn convert_folder(&self, folder: &Path) -> Result<UnifiedDocument, ConverterError> {
        log::info!("Converting acquisition {}", folder.to_string_lossy());
        let xml = XmlResult::read_file(&folder.join(&self.xml_file_name))?;
        let ch_file = ChFile::open(&folder.join(&self.ch_file_name))?;
        let column = ColumnInfo::read_file(&folder.join(&self.txt_file_name))?;
        let metadata = &ch_file.metadata;
        let strategy = self.merge_strategy;

        let analyst =
            reconcile_observed("analyst", metadata.operator.clone(), xml.operator.clone(), strategy)?;
        let submitter =
            reconcile_observed("submitter", metadata.operator.clone(), xml.operator.clone(), strategy)?;
        let method = reconcile_observed(
            "device method identifier",
            metadata.method.clone(),
            xml.method.clone(),
            strategy,
        )?;
        let sample_identifier = reconcile_observed(
            "sample identifier",
            metadata.sample_name.clone(),
            xml.sample_name.clone(),
            strategy,
        )?;
        let written_name = reconcile_observed(
            "sample written name",
            metadata.sample_name.clone(),
            xml.sample_name.clone(),
            strategy,
        )?;

        let xml_time = self.normalizer.normalize(&xml.injection_date_time)?;
        let injection_time = match metadata.injection_date_time.as_deref() {
            Some(raw) => reconcile(
                "injection time",
                self.normalizer.normalize(raw)?,
                xml_time,
                strategy,
            )?,
            None => xml_time,
        };

        let volume_text = xml
            .injection_volume
            .as_deref()
            .unwrap_or(&xml.injection_identifier);
        let volume = match volume_text.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => return Err(ConverterError::InvalidInjectionVolume(volume_text.to_string())),
        };

        let data_cube = ChromatogramDataCube::from_ch_file(&ch_file);
        log::info!(
            "Converted {} samples and {} peaks from {}",
            data_cube.len(),
            xml.peaks.len(),
            folder.to_string_lossy()
        );

        Ok(UnifiedDocument {
            device_system: DeviceSystem {
                asset_management_identifier: xml.instrument_name,
            },
            gas_chromatography: GasChromatography {
                analyst: Some(analyst),
                submitter: Some(submitter),
                device_method_identifier: Some(method),
                chromatography_column: column,
                detector_type: String::from(detector_type(&xml.detector)),
                sample: Sample {
                    sample_identifier: Some(sample_identifier),
                    written_name: Some(written_name),
                    description: xml.sample_info,
                },
                injection: Injection {
                    injection_identifier: xml.injection_identifier,
                    injection_time: Some(injection_time),
                    injection_volume: VolumeSetting::microliters(volume),
                },
                measurement: Measurement {
                    detection_type: xml.detector,
                    chromatogram_data_cube: data_cube,
                    peaks: xml.peaks,
                },
            },
        })
    }

    /// Convert from the .ch file alone. `path` is either the .ch file or the acquisition
    /// folder holding it.
    ///
    /// Fields only found in Result.xml or acq.txt are left empty.
    pub fn convert_ch_file(&self, path: &Path) -> Result<UnifiedDocument, ConverterError> {
        let ch_path = self.ch_file_path(path);
        log::warn!(
            "Converting {} without Result.xml or acq.txt; column, peak, instrument and injection information will be empty",
            ch_path.to_string_lossy()
        );
        let ch_file = ChFile::open(&ch_path)?;
        let injection_time = match ch_file.metadata.injection_date_time.as_deref() {
            Some(raw) => Some(self.normalizer.normalize(raw)?),
            None => None,
        };
        let metadata = &ch_file.metadata;

        Ok(UnifiedDocument {
            device_system: DeviceSystem::default(),
            gas_chromatography: GasChromatography {
                analyst: metadata.operator.clone(),
                submitter: metadata.operator.clone(),
                device_method_identifier: metadata.method.clone(),
                chromatography_column: ColumnInfo {
                    serial_number: Some(String::new()),
                    ..Default::default()
                },
                detector_type: String::new(),
                sample: Sample {
                    sample_identifier: metadata.sample_name.clone(),
                    written_name: metadata.sample_name.clone(),
                    description: None,
                },
                injection: Injection {
                    injection_identifier: String::new(),
                    injection_time,
                    injection_volume: VolumeSetting::microliters(f64::NAN),
                },
                measurement: Measurement {
                    detection_type: String::new(),
                    chromatogram_data_cube: ChromatogramDataCube::from_ch_file(&ch_file),
                    peaks: vec![],
                },
            },
        })
    }

    fn ch_file_path(&self, path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(&self.ch_file_name)
        } else {
            path.to_path_buf()
        }
    }
}
