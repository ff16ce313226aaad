use crate::job::{ExecutionMode, JobOptions};
use crate::output::OutputFormat;
use crate::selection::DEFAULT_EXTENSIONS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SEQREN_DIR: &str = ".seqren";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Extensions accepted when selecting files. Empty accepts everything.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Zero-pad the index to this many digits (0 = no padding)
    #[serde(default)]
    pub pad_width: usize,

    /// Detach observers once a job finishes
    #[serde(default = "default_true")]
    pub auto_dispose_on_finish: bool,

    /// Run renames on a worker thread ("background") or the caller's ("inline")
    #[serde(default)]
    pub execution_mode: ExecutionMode,

    /// Write a log of every rename to .seqren/logs/<job-id>.log
    #[serde(default = "default_true")]
    pub journal: bool,

    /// Default output format: "summary" or "json"
    #[serde(default = "default_output")]
    pub output_format: String,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            pad_width: 0,
            auto_dispose_on_finish: true,
            execution_mode: ExecutionMode::Background,
            journal: true,
            output_format: default_output(),
            use_color: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect()
}

fn default_output() -> String {
    "summary".to_string()
}

fn default_true() -> bool {
    true
}

impl DefaultsConfig {
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            auto_dispose_on_finish: self.auto_dispose_on_finish,
            execution_mode: self.execution_mode,
        }
    }

    /// Parsed `output_format`, falling back to summary for unknown values.
    pub fn output(&self) -> OutputFormat {
        self.output_format.parse().unwrap_or(OutputFormat::Summary)
    }
}

impl Config {
    /// Load config from .seqren/config.toml if it exists
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(SEQREN_DIR).join("config.toml");
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory for job logs under `base`
    pub fn logs_dir(base: &Path) -> PathBuf {
        base.join(SEQREN_DIR).join("logs")
    }
}
