use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the TGMD annotator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Annotation session settings
    pub session: SessionConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Annotator identity used when no auth collaborator supplies one
    pub annotator: Option<String>,

    /// Coarse jump step for backward/forward intents (seconds)
    pub jump_step_secs: f64,

    /// Fine jump step, roughly one frame at 25 fps (seconds)
    pub precise_step_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `{video_id}_annotations.csv`
    pub output_dir: PathBuf,

    /// Replace an existing export file with the same name
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from(&["tgmd-annotator.toml", "config/tgmd-annotator.toml"])
    }

    /// Load the first existing file among `paths`, falling back to the environment.
    ///
    /// A file that exists but cannot be parsed is an error, not skipped.
    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        for path in paths {
            if path.as_ref().is_file() {
                return Self::from_file(path);
            }
        }

        // Try environment variables
        Self::from_env()
    }

    /// Load configuration from one TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)?;
        match toml::from_str(&config_str) {
            Ok(config) => {
                tracing::info!("📄 Loaded configuration from: {}", path.display());
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                Err(anyhow!("Invalid config file {}: {}", path.display(), e))
            }
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(annotator) = std::env::var("TGMD_ANNOTATOR_ANNOTATOR") {
            config.session.annotator = Some(annotator);
        }

        if let Ok(step) = std::env::var("TGMD_ANNOTATOR_JUMP_STEP") {
            config.session.jump_step_secs = step.parse().unwrap_or(2.0);
        }

        if let Ok(output_dir) = std::env::var("TGMD_ANNOTATOR_OUTPUT_DIR") {
            config.export.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("TGMD_ANNOTATOR_LOG_LEVEL") {
            config.logging.level = log_level;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, step) in [
            ("jump_step_secs", self.session.jump_step_secs),
            ("precise_step_secs", self.session.precise_step_secs),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(anyhow!("{} must be a positive number of seconds", name));
            }
        }

        if self.session.precise_step_secs > self.session.jump_step_secs {
            return Err(anyhow!("precise_step_secs must not exceed jump_step_secs"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(anyhow!("log level must not be empty"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "TGMD Annotator Configuration:\n\
            - Jump Step: {}s (precise {}s)\n\
            - Annotator Configured: {}\n\
            - Output Directory: {}\n\
            - Overwrite Exports: {}\n\
            - Log Level: {}",
            self.session.jump_step_secs,
            self.session.precise_step_secs,
            self.session.annotator.is_some(),
            self.export.output_dir.display(),
            self.export.overwrite,
            self.logging.level
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                annotator: None,
                jump_step_secs: 2.0,
                precise_step_secs: 0.04,
            },
            export: ExportConfig {
                output_dir: PathBuf::from("./output"),
                overwrite: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_annotator(mut self, annotator: String) -> Self {
        self.config.session.annotator = Some(annotator);
        self
    }

    pub fn with_jump_step(mut self, secs: f64) -> Self {
        self.config.session.jump_step_secs = secs;
        self
    }

    pub fn with_precise_step(mut self, secs: f64) -> Self {
        self.config.session.precise_step_secs = secs;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.export.output_dir = dir;
        self
    }

    pub fn overwrite_exports(mut self, overwrite: bool) -> Self {
        self.config.export.overwrite = overwrite;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
