use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Unit {0:?} is not compatible with electric current")]
    IncompatibleUnit(String),
}

#[derive(Debug, Error)]
pub enum ChFileError {
    #[error("ChFile version {0:?} is not supported; expected 179 or 181")]
    UnsupportedVersion(String),
    #[error("ChFile failed due to unit error: {0}")]
    IncompatibleUnit(#[from] UnitError),
    #[error("ChFile of {0} bytes holds more samples than can be addressed")]
    FileTooLarge(u64),
    #[error("ChFile header ended before field {field} at offset {offset}")]
    TruncatedHeader { field: &'static str, offset: u64 },
    #[error("Could not open ChFile because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("ChFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ColumnInfoError {
    #[error("No Column(s) section found in acquisition log {0:?}")]
    SectionNotFound(PathBuf),
    #[error("Column(s) section does not list Model#, Manufacturer, Diameter, Length and Film thickness")]
    IncompleteSection,
    #[error("Could not read column information because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("ColumnInfo failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateTimeError {
    #[error("Injection date has an unknown format. Original string is: {0:?}")]
    UnrecognizedFormat(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("Conflicting values for {field}: .ch file has {primary}, other files have {secondary}")]
    ConflictingValues {
        field: &'static str,
        primary: String,
        secondary: String,
    },
}

#[derive(Debug, Error)]
pub enum XmlResultError {
    #[error("XmlResult failed to parse XML: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("XmlResult is missing required element {0}")]
    MissingField(&'static str),
    #[error("Could not open XmlResult because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("XmlResult failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config names unknown time zone {0:?}")]
    UnknownTimeZone(String),
}

#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("Converter failed due to ChFile error: {0}")]
    ChFileError(#[from] ChFileError),
    #[error("Converter failed due to ColumnInfo error: {0}")]
    ColumnInfoError(#[from] ColumnInfoError),
    #[error("Converter failed due to date-time error: {0}")]
    DateTimeError(#[from] DateTimeError),
    #[error("Converter failed due to reconciliation error: {0}")]
    ReconcileError(#[from] ReconcileError),
    #[error("Converter failed due to XmlResult error: {0}")]
    XmlResultError(#[from] XmlResultError),
    #[error("Converter failed due to configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Converter could not parse injection volume {0:?} as a number")]
    InvalidInjectionVolume(String),
}

#[derive(Debug, Error)]
pub enum JsonWriterError {
    #[error("JsonWriter failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("JsonWriter failed to serialize document: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Converter error in {path:?}: {source}")]
    ConverterError {
        path: PathBuf,
        #[source]
        source: ConverterError,
    },
    #[error("Processor failed due to JsonWriter error: {0}")]
    JsonWriterError(#[from] JsonWriterError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor did not find any acquisitions in {0:?}")]
    NoAcquisitions(PathBuf),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
