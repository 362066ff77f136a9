use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;

use super::error::XmlResultError;

// Element names of a ChemStation Result.xml, relative to the document root
const ACQUISITION: &str = "Acquisition";
const INSTRUMENT_NAME: &str = "InstrumentName";
const SAMPLE_INFORMATION: &str = "SampleInformation";
const OPERATOR: &str = "Operator";
const METHOD: &str = "Method";
const SAMPLE_NAME: &str = "SampleName";
const SAMPLE_INFO: &str = "SampleInfo";
const INJ: &str = "Inj";
const INJ_VOLUME: &str = "InjVolume";
const INJECTION_DATE_TIME: &str = "InjectionDateTime";
const CHROMATOGRAMS: &str = "Chromatograms";
const SIGNAL: &str = "Signal";
const DETECTOR: &str = "Detector";
const RESULTS: &str = "Results";
const RESULTS_GROUP: &str = "ResultsGroup";
const PEAK: &str = "Peak";

/// One integrated peak of the result file. The converter only passes peaks through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Peak {
    pub identifier: Option<String>,
    pub name: Option<String>,
    /// Minutes
    pub retention_time: Option<f64>,
    pub area: Option<f64>,
    pub height: Option<f64>,
    /// Minutes
    pub width: Option<f64>,
    pub area_percent: Option<f64>,
}

impl Peak {
    fn assign(&mut self, element: &str, text: &str) {
        match element {
            "ID" => self.identifier = Some(text.to_string()),
            "Name" => self.name = Some(text.to_string()),
            "RetTime" => self.retention_time = parse_peak_number(element, text),
            "Area" => self.area = parse_peak_number(element, text),
            "Height" => self.height = parse_peak_number(element, text),
            "Width" => self.width = parse_peak_number(element, text),
            "AreaPercent" => self.area_percent = parse_peak_number(element, text),
            _ => (),
        }
    }
}

fn parse_peak_number(element: &str, text: &str) -> Option<f64> {
    match text.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Peak {element} value {text:?} is not a number; leaving it empty");
            None
        }
    }
}

/// The named fields the converter consumes from a ChemStation Result.xml.
///
/// Only the first Signal's detector and the peaks of the first ResultsGroup are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlResult {
    pub instrument_name: String,
    pub operator: String,
    pub method: String,
    pub sample_name: String,
    pub sample_info: Option<String>,
    pub injection_identifier: String,
    pub injection_volume: Option<String>,
    pub injection_date_time: String,
    pub detector: String,
    pub peaks: Vec<Peak>,
}

#[derive(Debug, Default)]
struct PartialResult {
    instrument_name: Option<String>,
    operator: Option<String>,
    method: Option<String>,
    sample_name: Option<String>,
    sample_info: Option<String>,
    injection_identifier: Option<String>,
    injection_volume: Option<String>,
    injection_date_time: Option<String>,
    detector: Option<String>,
    peaks: Vec<Peak>,
    signal_count: usize,
    results_group_count: usize,
    current_peak: Option<Peak>,
}

impl PartialResult {
    /// Called when an element opens; `path` excludes the root and includes the element
    fn open(&mut self, path: &[&str]) {
        match path {
            [CHROMATOGRAMS, SIGNAL] => self.signal_count += 1,
            [RESULTS, RESULTS_GROUP] => self.results_group_count += 1,
            [RESULTS, RESULTS_GROUP, PEAK] if self.results_group_count == 1 => {
                self.current_peak = Some(Peak::default())
            }
            _ => (),
        }
    }

    /// Called when an element closes with its accumulated text
    fn close(&mut self, path: &[&str], text: &str) {
        let value = Some(text.to_string());
        match path {
            [ACQUISITION, INSTRUMENT_NAME] => self.instrument_name = value,
            [SAMPLE_INFORMATION, OPERATOR] => self.operator = value,
            [SAMPLE_INFORMATION, METHOD] => self.method = value,
            [SAMPLE_INFORMATION, SAMPLE_NAME] => self.sample_name = value,
            [SAMPLE_INFORMATION, SAMPLE_INFO] => self.sample_info = value,
            [SAMPLE_INFORMATION, INJ] => self.injection_identifier = value,
            [SAMPLE_INFORMATION, INJ_VOLUME] => self.injection_volume = value,
            [SAMPLE_INFORMATION, INJECTION_DATE_TIME] => self.injection_date_time = value,
            [CHROMATOGRAMS, SIGNAL, DETECTOR] if self.signal_count == 1 => self.detector = value,
            [RESULTS, RESULTS_GROUP, PEAK] => {
                if let Some(peak) = self.current_peak.take() {
                    self.peaks.push(peak);
                }
            }
            [RESULTS, RESULTS_GROUP, PEAK, element] => {
                if let Some(peak) = self.current_peak.as_mut() {
                    peak.assign(element, text);
                }
            }
            _ => (),
        }
    }

    fn finish(self) -> Result<XmlResult, XmlResultError> {
        Ok(XmlResult {
            instrument_name: required(self.instrument_name, INSTRUMENT_NAME)?,
            operator: required(self.operator, OPERATOR)?,
            method: required(self.method, METHOD)?,
            sample_name: required(self.sample_name, SAMPLE_NAME)?,
            sample_info: self.sample_info,
            injection_identifier: required(self.injection_identifier, INJ)?,
            injection_volume: self.injection_volume,
            injection_date_time: required(self.injection_date_time, INJECTION_DATE_TIME)?,
            detector: required(self.detector, DETECTOR)?,
            peaks: self.peaks,
        })
    }
}

fn required(value: Option<String>, element: &'static str) -> Result<String, XmlResultError> {
    value.ok_or(XmlResultError::MissingField(element))
}

impl XmlResult {
    /// Read a Result.xml file. The file handle is released before returning.
    pub fn read_file(path: &Path) -> Result<Self, XmlResultError> {
        if !path.exists() {
            return Err(XmlResultError::BadFilePath(path.to_path_buf()));
        }
        let reader = Reader::from_file(path)?;
        Self::read(reader)
    }

    pub fn parse(xml: &str) -> Result<Self, XmlResultError> {
        Self::read(Reader::from_str(xml))
    }

    fn read<R: BufRead>(mut reader: Reader<R>) -> Result<Self, XmlResultError> {
        reader.config_mut().trim_text(true);

        let mut partial = PartialResult::default();
        let mut stack: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    text.clear();
                    partial.open(&relative_path(&stack));
                }
                Ok(Event::Empty(ref e)) => {
                    stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    let path = relative_path(&stack);
                    partial.open(&path);
                    partial.close(&path, "");
                    stack.pop();
                }
                Ok(Event::Text(ref t)) => text.push_str(&t.unescape()?),
                Ok(Event::CData(ref t)) => text.push_str(&String::from_utf8_lossy(t)),
                Ok(Event::End(_)) => {
                    partial.close(&relative_path(&stack), text.trim());
                    text.clear();
                    stack.pop();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XmlResultError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        partial.finish()
    }
}

/// Element path below the document root
fn relative_path(stack: &[String]) -> Vec<&str> {
    stack.iter().skip(1).map(|s| s.as_str()).collect()
}
