//! Decoding of Agilent ChemStation .ch signal files.
//!
//! A .ch file is a fixed-layout header followed by the detector signal. The header
//! starts with a version tag; every other field lives at a fixed byte offset that
//! depends on that version. Two versions are supported:
//!
//! - `179`: the signal is a run of little-endian f64 words from the data start to the
//!   end of the file.
//! - `181`: the signal is delta encoded as big-endian i16 words. The word 32767 is an
//!   escape: it is followed by an i16 (high part) and an i32 (low part) which together
//!   give an absolute value and reset the running delta.
//!
//! Metadata floats are stored big-endian in both versions. Text fields are a single
//! length byte followed by that many UTF-16LE code units; the version tag itself uses
//! single-byte characters.
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use super::error::ChFileError;
use super::unit::CurrentUnit;

type MetadataOrder = BigEndian;
type V179DataOrder = LittleEndian;
type V181DataOrder = BigEndian;

const VERSION_POSITION: u64 = 0;
/// Stored times are divided by this to obtain minutes
const TIME_DIVISOR: f32 = 60_000.0;
/// v181 sentinel announcing an absolute value
const ESCAPE_WORD: i16 = 32767;
const V179_WORD_SIZE: u64 = 8;

/// Byte offsets of the header fields for one .ch version.
///
/// Offsets follow PyExpLabSys (v179) and chemplexity ImportAgilentFID (v181).
#[derive(Debug)]
struct Layout {
    data_start: u64,
    start_time: u64,
    end_time: u64,
    units: u64,
    y_offset: u64,
    y_scaling: u64,
    detector: u64,
    operator: Option<u64>,
    method: Option<u64>,
    sample_name: Option<u64>,
    injection_date_time: Option<u64>,
}

const LAYOUT_179: Layout = Layout {
    data_start: 6144,
    start_time: 282,
    end_time: 286,
    units: 4172,
    y_offset: 4724,
    y_scaling: 4732,
    detector: 4213,
    operator: None,
    method: None,
    sample_name: None,
    injection_date_time: None,
};

const LAYOUT_181: Layout = Layout {
    data_start: 6144,
    start_time: 282,
    end_time: 286,
    units: 4172,
    y_offset: 4724,
    y_scaling: 4732,
    detector: 4213,
    operator: Some(1880),
    method: Some(2574),
    sample_name: Some(858),
    injection_date_time: Some(2391),
};

/// The supported .ch file versions.
///
/// The version is read once from the header and selects both the offset table and the
/// signal decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChFileVersion {
    V179,
    V181,
}

impl ChFileVersion {
    /// Identify the version from the raw header tag
    pub fn from_tag(tag: &str) -> Result<Self, ChFileError> {
        match tag {
            "179" => Ok(Self::V179),
            "181" => Ok(Self::V181),
            _ => Err(ChFileError::UnsupportedVersion(tag.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::V179 => "179",
            Self::V181 => "181",
        }
    }

    fn layout(&self) -> &'static Layout {
        match self {
            Self::V179 => &LAYOUT_179,
            Self::V181 => &LAYOUT_181,
        }
    }

    /// Decode the signal, returning values in picoampere
    fn decode_samples<R: Read + Seek>(
        &self,
        reader: &mut R,
        metadata: &FileMetadata,
    ) -> Result<Vec<f64>, ChFileError> {
        match self {
            Self::V179 => decode_v179(reader, self.layout(), metadata),
            Self::V181 => decode_v181(reader, self.layout(), metadata),
        }
    }
}

impl fmt::Display for ChFileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Run metadata stored in the .ch header.
///
/// Operator, method, sample name and injection date-time are only present in v181
/// files; they are None for v179.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    /// Minutes
    pub start_time: f32,
    /// Minutes
    pub end_time: f32,
    pub unit: CurrentUnit,
    pub y_offset: f64,
    pub y_scaling: f64,
    pub detector: String,
    pub operator: Option<String>,
    pub method: Option<String>,
    pub sample_name: Option<String>,
    pub injection_date_time: Option<String>,
}

impl FileMetadata {
    /// Apply the stored linear transform and convert to picoampere
    fn signal_value(&self, raw: f64) -> f64 {
        self.unit.to_picoampere(raw * self.y_scaling + self.y_offset)
    }
}

/// A fully decoded .ch file.
///
/// ChFile is built in a single pass: the header is read, the unit is validated, then
/// the signal is decoded. No partially read ChFile is ever returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChFile {
    pub version: ChFileVersion,
    pub metadata: FileMetadata,
    /// Detector signal in picoampere, one value per acquisition tick
    pub samples: Vec<f64>,
}

impl ChFile {
    /// Open and decode the .ch file at path. The file handle is released before returning.
    pub fn open(path: &Path) -> Result<Self, ChFileError> {
        if !path.exists() {
            return Err(ChFileError::BadFilePath(path.to_path_buf()));
        }
        let file = File::open(path)?;
        log::debug!(
            "Decoding {} ({})",
            path.to_string_lossy(),
            human_bytes::human_bytes(file.metadata()?.len() as f64)
        );
        Self::from_reader(BufReader::new(file))
    }

    /// Decode a .ch image from any seekable reader
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self, ChFileError> {
        let tag = read_version_tag(&mut reader)?;
        let version = ChFileVersion::from_tag(&tag)?;
        let metadata = read_metadata(&mut reader, version.layout())?;
        let samples = version.decode_samples(&mut reader, &metadata)?;
        log::debug!(
            "Decoded version {} .ch file with {} samples in {}",
            version,
            samples.len(),
            metadata.unit
        );
        Ok(Self {
            version,
            metadata,
            samples,
        })
    }

    /// Retention time of every sample in seconds, evenly spaced from start to end time
    pub fn retention_times(&self) -> Vec<f64> {
        let start = self.metadata.start_time as f64 * 60.0;
        let end = self.metadata.end_time as f64 * 60.0;
        let n = self.samples.len();
        if n < 2 {
            return vec![start; n];
        }
        let step = (end - start) / (n - 1) as f64;
        (0..n).map(|i| start + step * i as f64).collect()
    }
}

/// Header reads past the end of the file are reported with the field and offset
fn at_field<T>(result: std::io::Result<T>, field: &'static str, offset: u64) -> Result<T, ChFileError> {
    result.map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ChFileError::TruncatedHeader { field, offset }
        } else {
            ChFileError::IOError(e)
        }
    })
}

/// Signal reads past the end of the file simply end the signal
fn until_eof<T>(result: std::io::Result<T>) -> Result<Option<T>, ChFileError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(ChFileError::IOError(e)),
    }
}

fn read_version_tag<R: Read + Seek>(reader: &mut R) -> Result<String, ChFileError> {
    reader.seek(SeekFrom::Start(VERSION_POSITION))?;
    let length = at_field(reader.read_u8(), "version", VERSION_POSITION)?;
    let mut bytes = vec![0u8; length as usize];
    at_field(reader.read_exact(&mut bytes), "version", VERSION_POSITION)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_utf16_at<R: Read + Seek>(
    reader: &mut R,
    field: &'static str,
    offset: u64,
) -> Result<String, ChFileError> {
    reader.seek(SeekFrom::Start(offset))?;
    let length = at_field(reader.read_u8(), field, offset)?;
    let mut units = vec![0u16; length as usize];
    at_field(reader.read_u16_into::<LittleEndian>(&mut units), field, offset)?;
    Ok(String::from_utf16_lossy(&units))
}

fn read_optional_utf16_at<R: Read + Seek>(
    reader: &mut R,
    field: &'static str,
    offset: Option<u64>,
) -> Result<Option<String>, ChFileError> {
    match offset {
        Some(o) => Ok(Some(read_utf16_at(reader, field, o)?)),
        None => Ok(None),
    }
}

fn read_time_at<R: Read + Seek>(
    reader: &mut R,
    field: &'static str,
    offset: u64,
) -> Result<f32, ChFileError> {
    reader.seek(SeekFrom::Start(offset))?;
    Ok(at_field(reader.read_f32::<MetadataOrder>(), field, offset)? / TIME_DIVISOR)
}

fn read_f64_at<R: Read + Seek>(
    reader: &mut R,
    field: &'static str,
    offset: u64,
) -> Result<f64, ChFileError> {
    reader.seek(SeekFrom::Start(offset))?;
    at_field(reader.read_f64::<MetadataOrder>(), field, offset)
}

fn read_metadata<R: Read + Seek>(reader: &mut R, layout: &Layout) -> Result<FileMetadata, ChFileError> {
    let start_time = read_time_at(reader, "start time", layout.start_time)?;
    let end_time = read_time_at(reader, "end time", layout.end_time)?;
    let unit = CurrentUnit::parse(&read_utf16_at(reader, "unit", layout.units)?)?;
    let y_offset = read_f64_at(reader, "y-offset", layout.y_offset)?;
    let y_scaling = read_f64_at(reader, "y-scaling", layout.y_scaling)?;
    let detector = read_utf16_at(reader, "detector", layout.detector)?;
    let operator = read_optional_utf16_at(reader, "operator", layout.operator)?;
    let method = read_optional_utf16_at(reader, "method", layout.method)?;
    let sample_name = read_optional_utf16_at(reader, "sample name", layout.sample_name)?;
    let injection_date_time =
        read_optional_utf16_at(reader, "injection date-time", layout.injection_date_time)?;

    Ok(FileMetadata {
        start_time,
        end_time,
        unit,
        y_offset,
        y_scaling,
        detector,
        operator,
        method,
        sample_name,
        injection_date_time,
    })
}

fn decode_v179<R: Read + Seek>(
    reader: &mut R,
    layout: &Layout,
    metadata: &FileMetadata,
) -> Result<Vec<f64>, ChFileError> {
    let file_length = reader.seek(SeekFrom::End(0))?;
    let n_words = file_length.saturating_sub(layout.data_start) / V179_WORD_SIZE;
    let n_words = usize::try_from(n_words).map_err(|_| ChFileError::FileTooLarge(file_length))?;

    reader.seek(SeekFrom::Start(layout.data_start))?;
    let mut samples = Vec::with_capacity(n_words);
    for _ in 0..n_words {
        let raw = reader.read_f64::<V179DataOrder>()?;
        samples.push(metadata.signal_value(raw));
    }
    Ok(samples)
}

fn decode_v181<R: Read + Seek>(
    reader: &mut R,
    layout: &Layout,
    metadata: &FileMetadata,
) -> Result<Vec<f64>, ChFileError> {
    reader.seek(SeekFrom::Start(layout.data_start))?;

    let mut samples = Vec::new();
    let mut total: i64 = 0;
    let mut delta: i64 = 0;
    loop {
        let Some(word) = until_eof(reader.read_i16::<V181DataOrder>())? else {
            break;
        };

        if word != ESCAPE_WORD {
            delta = delta.wrapping_add(word as i64);
            total = total.wrapping_add(delta);
        } else {
            let Some(high) = until_eof(reader.read_i16::<V181DataOrder>())? else {
                break;
            };
            let Some(low) = until_eof(reader.read_i32::<V181DataOrder>())? else {
                break;
            };
            total = ((high as i64) << 32).wrapping_add(low as i64);
            delta = 0;
        }

        samples.push(metadata.signal_value(total as f64));
    }
    Ok(samples)
}
