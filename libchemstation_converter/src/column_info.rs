use encoding_rs::{Encoding, UTF_16BE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use super::error::ColumnInfoError;

const BANNER: &str = "======";
const SECTION_TITLE: &str = "Column(s)";
// closing banner, blank line, Column Description, Inventory #
const LINES_TO_SKIP: usize = 4;
const SERIAL_NUMBER_PLACEHOLDER: &str = "N/A";
const MILLIMETER: &str = "mm";
// The log is re-encoded by ChemStation, so the micro sign usually arrives as "Âµ"
const MICROMETER_SYMBOLS: [&str; 3] = ["\u{00C2}\u{00B5}m", "\u{00B5}m", "\u{03BC}m"];

/// Attribute names in the order they appear, and whether the value is text only
/// (as opposed to a number followed by a unit)
const COLUMN_ATTRIBUTES: [(&str, bool); 5] = [
    ("Model#", true),
    ("Manufacturer", true),
    ("Diameter", false),
    ("Length", false),
    ("Film thickness", false),
];

static COLUMN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut pattern = String::new();
    for (name, is_text_only) in COLUMN_ATTRIBUTES {
        pattern.push_str(&regex::escape(name));
        pattern.push_str(r"\s*:\s*");
        if !is_text_only {
            pattern.push_str(r"([0-9.]+)\s*");
        }
        pattern.push_str(r"(\S+)\s+");
    }
    Regex::new(&pattern).expect("Invalid column information regex")
});

/// A numeric column dimension with its unit as written in the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub value: f64,
    pub unit: String,
}

/// Chromatography column description taken from the Column(s) section of acq.txt.
///
/// All fields are optional: a section whose numbers cannot be read yields an empty
/// ColumnInfo rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub part_number: Option<String>,
    pub manufacturer: Option<String>,
    /// Always in millimeters
    pub inner_diameter: Option<Measure>,
    pub length: Option<Measure>,
    pub film_thickness: Option<Measure>,
    pub serial_number: Option<String>,
}

impl ColumnInfo {
    /// Read the column information from a ChemStation acquisition log (UTF-16 text)
    pub fn read_file(path: &Path) -> Result<Self, ColumnInfoError> {
        if !path.exists() {
            return Err(ColumnInfoError::BadFilePath(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        Self::parse(&decode_utf16(&bytes), path)
    }

    /// Parse already decoded log text. `origin` is only used for error reporting.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ColumnInfoError> {
        let section = match column_section(text) {
            Some(s) => s,
            None => return Err(ColumnInfoError::SectionNotFound(origin.to_path_buf())),
        };

        let captures = match COLUMN_PATTERN.captures(section) {
            Some(c) => c,
            None => return Err(ColumnInfoError::IncompleteSection),
        };

        let diameter = match read_measure(&captures[3], &captures[4]) {
            Some(mut measure) => {
                if MICROMETER_SYMBOLS.contains(&measure.unit.as_str()) {
                    measure.value /= 1000.0;
                    measure.unit = String::from(MILLIMETER);
                }
                measure
            }
            None => return Ok(Self::malformed(origin, &captures[3])),
        };
        let length = match read_measure(&captures[5], &captures[6]) {
            Some(m) => m,
            None => return Ok(Self::malformed(origin, &captures[5])),
        };
        let film_thickness = match read_measure(&captures[7], &captures[8]) {
            Some(m) => m,
            None => return Ok(Self::malformed(origin, &captures[7])),
        };

        Ok(Self {
            part_number: Some(captures[1].to_string()),
            manufacturer: Some(captures[2].to_string()),
            inner_diameter: Some(diameter),
            length: Some(length),
            film_thickness: Some(film_thickness),
            serial_number: Some(String::from(SERIAL_NUMBER_PLACEHOLDER)),
        })
    }

    fn malformed(origin: &Path, raw: &str) -> Self {
        log::warn!(
            "Could not read column dimension {:?} in {}; column information left empty",
            raw,
            origin.to_string_lossy()
        );
        Self::default()
    }
}

fn read_measure(value: &str, unit: &str) -> Option<Measure> {
    Some(Measure {
        value: value.parse().ok()?,
        unit: unit.to_string(),
    })
}

/// Split off the first line of rest, leaving rest just after its newline
fn next_line<'a>(rest: &mut &'a str) -> Option<&'a str> {
    if rest.is_empty() {
        return None;
    }
    match rest.find('\n') {
        Some(idx) => {
            let line = &rest[..idx];
            *rest = &rest[idx + 1..];
            Some(line)
        }
        None => {
            let line = *rest;
            *rest = "";
            Some(line)
        }
    }
}

/// Text following the Column(s) header block, or None if there is no such section
fn column_section(text: &str) -> Option<&str> {
    let mut rest = text;
    loop {
        let line = next_line(&mut rest)?;
        if line.contains(BANNER) {
            let title = next_line(&mut rest)?;
            if title.contains(SECTION_TITLE) {
                break;
            }
        }
    }
    for _ in 0..LINES_TO_SKIP {
        next_line(&mut rest)?;
    }
    Some(rest)
}

/// Decode UTF-16 using the byte order mark, assuming big-endian when there is none
fn decode_utf16(bytes: &[u8]) -> String {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((UTF_16BE, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    if had_errors {
        log::warn!("Acquisition log contains invalid {} sequences", encoding.name());
    }
    text.into_owned()
}
