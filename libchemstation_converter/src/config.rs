use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::date_time::{DateTimeNormalizer, DEFAULT_DATE_FORMATS};
use super::error::ConfigError;
use super::reconcile::MergeStrategy;

/// Structure representing the application configuration. Contains pathing and conversion options
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// An acquisition folder, a single .ch file, or a directory of acquisition folders
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Convert from the .ch file alone, ignoring Result.xml and acq.txt
    pub binary_only: bool,
    /// IANA name of the zone the instrument clock runs in
    pub time_zone: String,
    pub date_formats: Vec<String>,
    pub ch_file_name: String,
    pub xml_file_name: String,
    pub txt_file_name: String,
    pub merge_strategy: MergeStrategy,
}

impl Default for Config {
    /// Generate a new Config object. Paths will be empty/invalid
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("None"),
            output_path: PathBuf::from("None"),
            binary_only: false,
            time_zone: String::from("UTC"),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            ch_file_name: String::from("FID1A.ch"),
            xml_file_name: String::from("Result.xml"),
            txt_file_name: String::from("acq.txt"),
            merge_strategy: MergeStrategy::default(),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Resolve the configured time zone name
    pub fn get_time_zone(&self) -> Result<Tz, ConfigError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(self.time_zone.clone()))
    }

    pub fn get_date_time_normalizer(&self) -> Result<DateTimeNormalizer, ConfigError> {
        Ok(DateTimeNormalizer::new(
            self.date_formats.clone(),
            self.get_time_zone()?,
        ))
    }

    /// Get the path to the output json file for an acquisition
    pub fn get_json_file_name(&self, acquisition: &Path) -> Result<PathBuf, ConfigError> {
        let stem = acquisition
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("acquisition"));
        if self.output_path.exists() {
            Ok(self.output_path.join(format!("{stem}.json")))
        } else {
            Err(ConfigError::BadFilePath(self.output_path.clone()))
        }
    }

    pub fn is_input_valid(&self) -> bool {
        self.input_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("merge_strategy: FailOnMismatch"));
        assert!(yaml.contains("ch_file_name: FID1A.ch"));
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.date_formats.len(), 2);
        assert_eq!(config.get_time_zone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_time_zone() {
        let mut config = Config::default();
        config.time_zone = String::from("Europe/Paris");
        assert_eq!(config.get_time_zone().unwrap(), chrono_tz::Europe::Paris);
        config.time_zone = String::from("Mars/Olympus_Mons");
        match config.get_date_time_normalizer() {
            Err(ConfigError::UnknownTimeZone(name)) => assert_eq!(name, "Mars/Olympus_Mons"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "input_path: /data/run.D\noutput_path: /data/json\nbinary_only: true\n\
             time_zone: Europe/Paris\ndate_formats:\n- '%d-%b-%y, %H:%M:%S'\n\
             ch_file_name: FID2B.ch\nxml_file_name: Result.xml\ntxt_file_name: acq.txt\n\
             merge_strategy: PreferPrimary\n",
        )
        .unwrap();
        let config = Config::read_config_file(&path).unwrap();
        assert!(config.binary_only);
        assert_eq!(config.ch_file_name, "FID2B.ch");
        assert_eq!(config.merge_strategy, MergeStrategy::PreferPrimary);

        match Config::read_config_file(&dir.path().join("missing.yml")) {
            Err(ConfigError::BadFilePath(_)) => (),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_json_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output_path = dir.path().to_path_buf();
        assert_eq!(
            config.get_json_file_name(Path::new("/data/22-00465.D")).unwrap(),
            dir.path().join("22-00465.json")
        );
        config.output_path = dir.path().join("nope");
        assert!(config.get_json_file_name(Path::new("run.D")).is_err());
    }
}
