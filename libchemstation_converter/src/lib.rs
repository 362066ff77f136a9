//! # chemstation_converter
//!
//! chemstation_converter turns Agilent ChemStation gas chromatography acquisitions into a
//! vendor neutral JSON document modeled on the Allotrope gas chromatography schema. It
//! reads the binary signal file (.ch), the integration results (Result.xml) and the
//! acquisition log (acq.txt) of an acquisition folder and merges them into a single
//! document holding the run metadata, the chromatogram and its peak list.
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust before, see the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation instructions.
//!
//! To build and install the CLI use `cargo install --path ./chemstation_converter_cli`
//! from the top level repository. The binary is installed to your cargo install location
//! (typically `~/.cargo/bin/`).
//!
//! ## Supported inputs
//!
//! - `.ch` files of version 179 (uncompressed f64 signal) and 181 (delta encoded
//! signal). The signal unit must be an electric current; values are reported in pA.
//! - `Result.xml` as written by ChemStation. Only the instrument name, the sample
//! information block, the first signal's detector and the peaks of the first results
//! group are read.
//! - `acq.txt` (UTF-16). Only the Column(s) section is read.
//!
//! When the .ch file and the other files both record a field (operator, method, sample
//! name, injection time) the values are merged following the configured merge strategy:
//! `PreferPrimary` keeps the .ch value, `PreferSecondary` keeps the other value, and
//! `FailOnMismatch` stops the conversion.
//!
//! A document can also be produced from the .ch file alone (`binary_only`). Column,
//! instrument, peak and injection information is then left empty.
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! input_path: None
//! output_path: None
//! binary_only: false
//! time_zone: UTC
//! date_formats:
//! - '%d-%b-%y, %H:%M:%S'
//! - '%d %b %y %I:%M %p'
//! ch_file_name: FID1A.ch
//! xml_file_name: Result.xml
//! txt_file_name: acq.txt
//! merge_strategy: FailOnMismatch
//! ```
//!
//! - `input_path`: an acquisition folder, a single .ch file, or a directory containing
//! acquisition folders
//! - `output_path`: directory receiving one `<acquisition>.json` per acquisition
//! - `time_zone`: IANA name of the zone the instrument clock runs in. Injection times
//! are written in UTC.
//! - `date_formats`: chrono format strings tried on injection timestamps. When several
//! formats match, the last one wins.
//!
//! ## Output
//!
//! ```text
//! device_system - asset_management_identifier
//! gas_chromatography - analyst, submitter, device_method_identifier, detector_type
//! |---- chromatography_column - part_number, manufacturer, inner_diameter, length, film_thickness, serial_number
//! |---- sample - sample_identifier, written_name, description
//! |---- injection - injection_identifier, injection_time, injection_volume
//! |---- measurement - detection_type
//! |    |---- chromatogram_data_cube - label
//! |    |    |---- dimension (retention time, s)
//! |    |    |---- measure (intensity, pA)
//! |    |---- peaks
//! ```
pub mod ch_file;
pub mod column_info;
pub mod config;
pub mod converter;
pub mod date_time;
pub mod document;
pub mod error;
pub mod json_writer;
pub mod process;
pub mod reconcile;
pub mod unit;
pub mod xml_result;

#[cfg(test)]
mod test_fixtures;
