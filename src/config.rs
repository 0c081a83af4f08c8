use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Parser, Debug, Default)]
#[command(name = "media-convert-gui")]
#[command(about = "Desktop front end for a YouTube audio/video conversion server")]
pub struct Args {
    /// Base URL of the conversion server
    #[arg(short, long)]
    pub server: Option<String>,

    /// Where downloaded files are saved
    #[arg(short, long)]
    pub download_dir: Option<PathBuf>,

    /// UI language, e.g. en-US or es-ES
    #[arg(short, long)]
    pub language: Option<String>,

    /// Config file to read instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
pub struct Config {
    pub server_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub language: Option<String>,
}

impl Config {
    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| {
            dirs::download_dir().unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        })
    }

    /// Command line values win over the file.
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(server) = &args.server {
            self.server_url = Some(server.clone());
        }
        if let Some(dir) = &args.download_dir {
            self.download_dir = Some(dir.clone());
        }
        if let Some(language) = &args.language {
            self.language = Some(language.clone());
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("media-convert-gui").join("config.toml"))
}

/// A missing file is not an error; a broken one is.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn resolve(args: &Args) -> Result<Config> {
    let config = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(path) => load_config(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.apply_args(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_url(), "http://localhost:5000");
        assert!(config.language.is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(r#"server_url = "http://nas:5000""#).unwrap();
        assert_eq!(config.server_url(), "http://nas:5000");
        assert!(config.download_dir.is_none());
    }

    #[test]
    fn test_args_override_file() {
        let file = Config {
            server_url: Some("http://nas:5000".into()),
            download_dir: Some(PathBuf::from("/music")),
            language: None,
        };
        let args = Args::parse_from(["media-convert-gui", "--server", "http://other:8080", "-l", "es-ES"]);
        let config = file.apply_args(&args);

        assert_eq!(config.server_url(), "http://other:8080");
        assert_eq!(config.download_dir(), PathBuf::from("/music"));
        assert_eq!(config.language.as_deref(), Some("es-ES"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("media-convert-gui-does-not-exist.toml");
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_broken_file_is_error() {
        let path = std::env::temp_dir().join(format!("media-convert-gui-bad-{}.toml", std::process::id()));
        fs::write(&path, "server_url = [").unwrap();
        assert!(load_config(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
