use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one `<name>.json` per SOP
    pub documents: String,
    /// Directory the image picker starts browsing from
    pub images: String,
    /// Directory for logs and other runtime files
    pub state: String,
}

/// Image picker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// File extensions offered by the image picker (case-insensitive, no dot)
    #[serde(default = "default_image_extensions")]
    pub extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "bmp"]
        .iter()
        .map(|e| (*e).to_string())
        .collect()
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extensions: default_image_extensions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Visible text rows of a step's summary box
    #[serde(default = "default_summary_height")]
    pub summary_height: u16,
    /// Maximum characters in a step title
    #[serde(default = "default_title_max_length")]
    pub title_max_length: usize,
}

fn default_summary_height() -> u16 {
    4
}

fn default_title_max_length() -> usize {
    80
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            summary_height: default_summary_height(),
            title_max_length: default_title_max_length(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".sopmaker/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Embedded defaults so sopmaker works without any config file
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/sopmaker/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sopmaker").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // SOPMAKER__PATHS__DOCUMENTS=... and friends
        builder = builder.add_source(
            config::Environment::with_prefix("SOPMAKER")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("images.extensions")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to `.sopmaker/config.toml`
    pub fn save(&self) -> Result<()> {
        let config_path = Self::local_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to the documents directory
    pub fn documents_path(&self) -> PathBuf {
        absolute(&self.paths.documents)
    }

    /// Get absolute path to the image browsing root
    pub fn images_path(&self) -> PathBuf {
        absolute(&self.paths.images)
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        absolute(&self.paths.state)
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Whether the picker should offer a file with this extension
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.images
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

fn absolute(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                documents: "sops".to_string(), // Relative to cwd
                images: ".".to_string(),
                state: ".sopmaker".to_string(),
            },
            images: ImagesConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
