//! Pipeline Configuration
//! Input paths and output targets, loaded from TOML or defaulted.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid map size {width}x{height}")]
    InvalidMapSize { width: u32, height: u32 },
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub referendum: PathBuf,
    pub regions: PathBuf,
    pub departments: PathBuf,
    pub geometry: PathBuf,
    /// GeoJSON feature property holding the region code.
    pub geometry_code_property: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            referendum: PathBuf::from("data/referendum.csv"),
            regions: PathBuf::from("data/regions.csv"),
            departments: PathBuf::from("data/departments.csv"),
            geometry: PathBuf::from("data/regions.geojson"),
            geometry_code_property: "code".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub results_csv: Option<PathBuf>,
    pub map_png: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Open the interactive map window after the run.
    pub display: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_csv: None,
            map_png: None,
            width: 1000,
            height: 1000,
            display: true,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve every input path against `base` (relative paths only).
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        let input = &mut self.input;
        for path in [
            &mut input.referendum,
            &mut input.regions,
            &mut input.departments,
            &mut input.geometry,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.output.width, self.output.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidMapSize { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_fixed_data_paths() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.input.referendum, PathBuf::from("data/referendum.csv"));
        assert_eq!(config.input.geometry, PathBuf::from("data/regions.geojson"));
        assert!(config.output.display);
        assert!(config.output.map_png.is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [input]
            referendum = "fixtures/ref.csv"

            [output]
            map_png = "out/map.png"
            display = false
            "#,
        )
        .unwrap();

        assert_eq!(config.input.referendum, PathBuf::from("fixtures/ref.csv"));
        assert_eq!(config.input.regions, PathBuf::from("data/regions.csv"));
        assert_eq!(config.output.map_png, Some(PathBuf::from("out/map.png")));
        assert!(!config.output.display);
        assert_eq!(config.output.width, 1000);
    }

    #[test]
    fn zero_sized_map_is_rejected() {
        let err = PipelineConfig::from_toml_str("[output]\nwidth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMapSize { width: 0, .. }));
    }

    #[test]
    fn base_dir_only_prefixes_relative_paths() {
        let mut config = PipelineConfig::default();
        config.input.geometry = PathBuf::from("/abs/regions.geojson");
        let config = config.with_base_dir(Path::new("tests/fixtures"));

        assert_eq!(
            config.input.regions,
            PathBuf::from("tests/fixtures/data/regions.csv")
        );
        assert_eq!(config.input.geometry, PathBuf::from("/abs/regions.geojson"));
    }
}
