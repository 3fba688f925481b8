use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the tree factory RNG. 0 draws a fresh seed at startup.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_data_directory")]
    pub data_directory: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_directory() -> String {
    ".".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            data_directory: default_data_directory(),
            log_level: default_log_level(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.data_directory.trim().is_empty() {
            errors.push(
                "data_directory must not be empty. Example: data_directory = \"./forests\""
                    .to_string(),
            );
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_directory)
    }
}
