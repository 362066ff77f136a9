//! The vendor neutral document produced by a conversion.
//!
//! The layout follows the Allotrope gas chromatography tabular embed: one device system,
//! one gas chromatography document holding the run metadata, and one measurement with the
//! chromatogram and its peaks. Every field holds a single resolved value; fields that a
//! conversion path could not observe are None.
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ch_file::ChFile;
use super::column_info::ColumnInfo;
use super::unit::PICOAMPERE_SYMBOL;
use super::xml_result::Peak;

pub const MICROLITER_SYMBOL: &str = "\u{03BC}L";
pub const SECOND_SYMBOL: &str = "s";
const RETENTION_TIME_LABEL: &str = "retention time";
const INTENSITY_LABEL: &str = "intensity";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedDocument {
    pub device_system: DeviceSystem,
    pub gas_chromatography: GasChromatography,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceSystem {
    pub asset_management_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasChromatography {
    pub analyst: Option<String>,
    pub submitter: Option<String>,
    pub device_method_identifier: Option<String>,
    pub chromatography_column: ColumnInfo,
    /// Detector family, e.g. Flame Ionization
    pub detector_type: String,
    pub sample: Sample,
    pub injection: Injection,
    pub measurement: Measurement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sample {
    pub sample_identifier: Option<String>,
    pub written_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Injection {
    pub injection_identifier: String,
    pub injection_time: Option<DateTime<Utc>>,
    pub injection_volume: VolumeSetting,
}

/// serde_json writes a NaN value as null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSetting {
    pub value: f64,
    pub unit: String,
}

impl VolumeSetting {
    pub fn microliters(value: f64) -> Self {
        Self {
            value,
            unit: String::from(MICROLITER_SYMBOL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Detector name as written by the instrument
    pub detection_type: String,
    pub chromatogram_data_cube: ChromatogramDataCube,
    pub peaks: Vec<Peak>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    pub unit: String,
    pub values: Vec<f64>,
}

/// The decoded signal laid out as one dimension (retention time) and one measure (intensity)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromatogramDataCube {
    pub label: String,
    pub dimension: Axis,
    pub measure: Axis,
}

impl ChromatogramDataCube {
    pub fn from_ch_file(ch_file: &ChFile) -> Self {
        Self {
            label: ch_file.metadata.detector.clone(),
            dimension: Axis {
                label: String::from(RETENTION_TIME_LABEL),
                unit: String::from(SECOND_SYMBOL),
                values: ch_file.retention_times(),
            },
            measure: Axis {
                label: String::from(INTENSITY_LABEL),
                unit: String::from(PICOAMPERE_SYMBOL),
                values: ch_file.samples.clone(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.measure.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measure.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::ChFixture;
    use std::io::Cursor;

    #[test]
    fn test_data_cube_axes() {
        let mut fixture = ChFixture::v179();
        fixture.start_time = 0.0;
        fixture.end_time = 1.0;
        fixture.y_scaling = 1.0;
        let image = fixture.v179_image(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let ch_file = ChFile::from_reader(Cursor::new(image)).unwrap();

        let cube = ChromatogramDataCube::from_ch_file(&ch_file);
        assert_eq!(cube.label, "FID1A, Front Signal");
        assert_eq!(cube.len(), 5);
        assert_eq!(cube.dimension.unit, "s");
        assert_eq!(cube.dimension.values, vec![0.0, 15.0, 30.0, 45.0, 60.0]);
        assert_eq!(cube.measure.unit, "pA");
        assert_eq!(cube.measure.values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_nan_volume_serializes_as_null() {
        let json = serde_json::to_value(VolumeSetting::microliters(f64::NAN)).unwrap();
        assert!(json["value"].is_null());
        assert_eq!(json["unit"], "\u{03BC}L");
    }
}
