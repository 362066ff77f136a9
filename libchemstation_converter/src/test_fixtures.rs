// Synthetic ChemStation inputs shared by the unit tests.
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::path::Path;

const HEADER_SIZE: usize = 6144;

/// One record of a v181 signal stream
#[derive(Debug, Clone, Copy)]
pub enum V181Word {
    Delta(i16),
    Absolute(i16, i32),
}

/// Header values of a synthetic .ch file
#[derive(Debug, Clone)]
pub struct ChFixture {
    pub version: &'static str,
    /// Minutes
    pub start_time: f32,
    /// Minutes
    pub end_time: f32,
    pub unit: &'static str,
    pub detector: &'static str,
    pub operator: &'static str,
    pub method: &'static str,
    pub sample_name: &'static str,
    pub injection_date_time: &'static str,
    pub y_offset: f64,
    pub y_scaling: f64,
}

impl ChFixture {
    /// Mirrors the header of the FID1A.ch acquisition used as v179 reference
    pub fn v179() -> Self {
        Self {
            version: "179",
            start_time: 0.0,
            end_time: 239.463_33,
            unit: "pA",
            detector: "FID1A, Front Signal",
            operator: "",
            method: "",
            sample_name: "",
            injection_date_time: "",
            y_offset: 0.0,
            y_scaling: 1.302_083_33e-4,
        }
    }

    /// Mirrors the header of the V181.ch acquisition used as v181 reference
    pub fn v181() -> Self {
        Self {
            version: "181",
            start_time: -0.001_268,
            end_time: 19.705_397,
            unit: "pA",
            detector: "",
            operator: "SYSTEM",
            method: "DET3300.M",
            sample_name: "140+H",
            injection_date_time: "23-Aug-22, 12:48:20",
            y_offset: 0.0,
            y_scaling: 1.302_083_33e-4,
        }
    }

    fn header(&self) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_SIZE];
        header[0] = self.version.len() as u8;
        header[1..1 + self.version.len()].copy_from_slice(self.version.as_bytes());

        put_f32(&mut header, 282, self.start_time * 60_000.0);
        put_f32(&mut header, 286, self.end_time * 60_000.0);
        put_utf16(&mut header, 4172, self.unit);
        put_utf16(&mut header, 4213, self.detector);
        put_utf16(&mut header, 858, self.sample_name);
        put_utf16(&mut header, 1880, self.operator);
        put_utf16(&mut header, 2391, self.injection_date_time);
        put_utf16(&mut header, 2574, self.method);
        put_f64(&mut header, 4724, self.y_offset);
        put_f64(&mut header, 4732, self.y_scaling);
        header
    }

    /// Header followed by little-endian f64 words
    pub fn v179_image(&self, raw: &[f64]) -> Vec<u8> {
        let mut image = self.header();
        for value in raw {
            image.write_f64::<LittleEndian>(*value).unwrap();
        }
        image
    }

    /// Header followed by a big-endian delta stream
    pub fn v181_image(&self, words: &[V181Word]) -> Vec<u8> {
        let mut image = self.header();
        for word in words {
            match word {
                V181Word::Delta(d) => image.write_i16::<BigEndian>(*d).unwrap(),
                V181Word::Absolute(high, low) => {
                    image.write_i16::<BigEndian>(32767).unwrap();
                    image.write_i16::<BigEndian>(*high).unwrap();
                    image.write_i32::<BigEndian>(*low).unwrap();
                }
            }
        }
        image
    }
}

fn put_f32(buffer: &mut [u8], offset: usize, value: f32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn put_f64(buffer: &mut [u8], offset: usize, value: f64) {
    buffer[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
}

fn put_utf16(buffer: &mut [u8], offset: usize, text: &str) {
    let units: Vec<u16> = text.encode_utf16().collect();
    buffer[offset] = units.len() as u8;
    for (idx, unit) in units.iter().enumerate() {
        let at = offset + 1 + 2 * idx;
        buffer[at..at + 2].copy_from_slice(&unit.to_le_bytes());
    }
}

/// Encode text the way ChemStation writes acq.txt: UTF-16LE with a byte order mark
pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// Acquisition log excerpt with the column section laid out one attribute per line
pub const ACQ_TEXT: &str = "\
Acquisition Method Information
=====================================================================
                           Front Inlet
=====================================================================

Mode                  : Split
=====================================================================
                          Column(s)
=====================================================================

Column Description :  HP-PONA
Inventory #           : USN123456
Model#                : 19091S-001
Manufacturer          : Agilent
Diameter              : 200 \u{00C2}\u{00B5}m
Length                : 50 m
Film thickness        : 0.50 \u{00C2}\u{00B5}m

=====================================================================
                          Oven
=====================================================================
";

/// Minimal ChemStation Result.xml carrying the fields of the v179 reference acquisition
pub const RESULT_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ChemStationResult>
  <Acquisition>
    <InstrumentName>GC65</InstrumentName>
  </Acquisition>
  <SampleInformation>
    <Operator>SYSTEM</Operator>
    <Method>DET401.M</Method>
    <SampleName>22-00465-1</SampleName>
    <SampleInfo>22-00465-1 - E2046501 - DET : 401 - delai Lims : 11/02/2022</SampleInfo>
    <Inj>1</Inj>
    <InjectionDateTime>12-May-22, 11:24:28</InjectionDateTime>
  </SampleInformation>
  <Chromatograms>
    <Signal>
      <Detector>FID1A</Detector>
    </Signal>
    <Signal>
      <Detector>TCD2B</Detector>
    </Signal>
  </Chromatograms>
  <Results>
    <ResultsGroup>
      <Peak>
        <ID>1</ID>
        <Name>Methane</Name>
        <RetTime>1.523</RetTime>
        <Area>1520.25</Area>
        <Height>310.5</Height>
        <Width>0.041</Width>
        <AreaPercent>12.5</AreaPercent>
      </Peak>
      <Peak>
        <ID>2</ID>
        <Name>Ethane &amp; co</Name>
        <RetTime>2.817</RetTime>
        <Area>n.a.</Area>
      </Peak>
    </ResultsGroup>
    <ResultsGroup>
      <Peak>
        <ID>99</ID>
        <RetTime>9.9</RetTime>
      </Peak>
    </ResultsGroup>
  </Results>
</ChemStationResult>
"#;

/// Lay out a complete v179 acquisition folder (FID1A.ch, Result.xml, acq.txt) in dir
pub fn write_v179_folder(dir: &Path, samples: usize) {
    let fixture = ChFixture::v179();
    let raw = vec![2.165_234 / fixture.y_scaling; samples];
    std::fs::write(dir.join("FID1A.ch"), fixture.v179_image(&raw)).unwrap();
    std::fs::write(dir.join("Result.xml"), RESULT_XML).unwrap();
    std::fs::write(dir.join("acq.txt"), utf16le_with_bom(ACQ_TEXT)).unwrap();
}
