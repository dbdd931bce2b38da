use serde::Deserialize;
use std::io::Read;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use thiserror::*;
use url::Url;

/// Bound shared by the intent and terminal input channels.
pub const CHANNEL_SIZE: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error {0} when reading config")]
    IoError(#[from] std::io::Error),
    #[error("cannot open config file '{0}' : {1}")]
    OpeningError(PathBuf, std::io::Error),
    #[error("UTF8 format error when reading config")]
    Utf8Error,
    #[error("format error {0} when reading config")]
    FormatError(#[from] serde_yaml::Error),
}

#[derive(Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: Url,
    pub key: String,
}

#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    pub url: Url,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

#[derive(Deserialize)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub gemini: GeminiConfig,
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let p = path.as_ref();
        let mut file = File::open(p).map_err(|e| ConfigError::OpeningError(p.to_owned(), e))?;
        let mut contents = vec![];
        file.read_to_end(&mut contents)?;
        let contents = String::from_utf8(contents).map_err(|_| ConfigError::Utf8Error)?;
        let config = Config::from_str(&contents)?;
        Ok(config)
    }
}

pub mod testdata {
    use super::Config;

    #[allow(dead_code)]
    pub fn test_config() -> Config {
        Config::from_str(
            r#"
        supabase:
            url: "https://example-project.supabase.co"
            key: "test-anon-key"
        gemini:
            url: "https://generativelanguage.googleapis.com"
            api_key: "test-gemini-key"
            model: "gemini-3-flash-preview"
        "#,
        )
        .unwrap()
    }
}
