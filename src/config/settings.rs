use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "scraper.yml";
pub const DEFAULT_CACHE_PREFIX: &str = "http://webcache.googleusercontent.com/search?q=cache:";

/// How page bodies are retrieved
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReaderKind {
    #[default]
    Http,
    Cache,
    File,
}

impl std::str::FromStr for ReaderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" => Ok(ReaderKind::Http),
            "cache" => Ok(ReaderKind::Cache),
            "file" => Ok(ReaderKind::File),
            other => bail!("Unknown reader '{}', expected http, cache or file", other),
        }
    }
}

/// How parsed records are printed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unknown format '{}', expected text or json", other),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScraperSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub reader: ReaderKind,
    pub cache_prefix: String,
    pub timeout_secs: u64,
    pub getter_workers: usize,
    pub parser_workers: usize,
    pub format: OutputFormat,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            definition: None,
            reader: ReaderKind::default(),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            timeout_secs: 30,
            getter_workers: 4,
            parser_workers: 4,
            format: OutputFormat::default(),
        }
    }
}

impl ScraperSettings {
    /// Load settings from `path`, or from `scraper.yml` when it exists, or
    /// fall back to defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_yaml(&yml)
    }

    pub fn from_yaml(yml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yml).context("Invalid yaml configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.getter_workers == 0 || self.parser_workers == 0 {
            bail!("Worker counts must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }
}
