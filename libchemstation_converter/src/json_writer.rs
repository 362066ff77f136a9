use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::document::UnifiedDocument;
use super::error::JsonWriterError;

/// A simple struct which wraps around serde_json.
///
/// Writes one UnifiedDocument per file, pretty printed.
#[derive(Debug)]
pub struct JsonWriter {
    file_handle: BufWriter<File>,
    path: PathBuf,
}

impl JsonWriter {
    /// Create the writer, creating (or truncating) the file at path
    pub fn new(path: &Path) -> Result<Self, JsonWriterError> {
        let file = File::create(path)?;
        Ok(Self {
            file_handle: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn write_document(&mut self, document: &UnifiedDocument) -> Result<(), JsonWriterError> {
        serde_json::to_writer_pretty(&mut self.file_handle, document)?;
        self.file_handle.write_all(b"\n")?;
        Ok(())
    }

    /// Flush and close the file, returning the number of bytes written
    pub fn close(mut self) -> Result<u64, JsonWriterError> {
        self.file_handle.flush()?;
        let size = self.file_handle.get_ref().metadata()?.len();
        log::info!(
            "Wrote {} ({})",
            self.path.to_string_lossy(),
            human_bytes::human_bytes(size as f64)
        );
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::converter::Converter;
    use crate::test_fixtures::write_v179_folder;

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        write_v179_folder(dir.path(), 3);
        let document = Converter::new(&Config::default())
            .unwrap()
            .convert_ch_file(dir.path())
            .unwrap();

        let path = dir.path().join("out.json");
        let mut writer = JsonWriter::new(&path).unwrap();
        writer.write_document(&document).unwrap();
        let size = writer.close().unwrap();
        assert!(size > 0);

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let gc = &json["gas_chromatography"];
        assert!(gc["injection"]["injection_volume"]["value"].is_null());
        assert_eq!(
            gc["measurement"]["chromatogram_data_cube"]["label"],
            "FID1A, Front Signal"
        );
        assert_eq!(
            gc["measurement"]["chromatogram_data_cube"]["measure"]["values"]
                .as_array()
                .unwrap()
                .len(),
            3
        );
    }
}
