use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    http::parse_base_url,
    mock::{MOCK_API_LATENCY, MOCK_AUTH_LATENCY},
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const SETTINGS_DIR: &str = "receptai";
const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiMode {
    #[default]
    Mock,
    Live,
}

impl FromStr for ApiMode {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ApiMode::Mock),
            "live" | "real" => Ok(ApiMode::Live),
            other => Err(SettingsError::InvalidApiMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown api mode '{0}' (expected 'mock' or 'live')")]
    InvalidApiMode(String),
    #[error("invalid api base url '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub api_mode: ApiMode,
    pub mock_latency: Duration,
    pub auth_latency: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            api_mode: ApiMode::Mock,
            mock_latency: MOCK_API_LATENCY,
            auth_latency: MOCK_AUTH_LATENCY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_base_url: Option<String>,
    api_mode: Option<ApiMode>,
    mock_latency_ms: Option<u64>,
    auth_latency_ms: Option<u64>,
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Defaults, then the settings file, then environment overrides.
///
/// An explicit path must exist; the default location is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    match explicit_path {
        Some(path) => settings.apply_file(path)?,
        None => {
            if let Some(path) = default_settings_path().filter(|path| path.exists()) {
                settings.apply_file(&path)?;
            }
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

impl ClientSettings {
    pub fn apply_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_toml(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "applied settings file");
        Ok(())
    }

    pub fn apply_toml(&mut self, raw: &str) -> Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.api_mode {
            self.api_mode = v;
        }
        if let Some(v) = file_cfg.mock_latency_ms {
            self.mock_latency = Duration::from_millis(v);
        }
        if let Some(v) = file_cfg.auth_latency_ms {
            self.auth_latency = Duration::from_millis(v);
        }
        Ok(())
    }

    /// Unparseable values are ignored, matching how the file layer treats
    /// absent keys.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RECEPTAI_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = lookup("APP__API_MODE") {
            if let Ok(mode) = v.parse() {
                self.api_mode = mode;
            }
        }

        if let Some(v) = lookup("APP__MOCK_LATENCY_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.mock_latency = Duration::from_millis(parsed);
            }
        }
        if let Some(v) = lookup("APP__AUTH_LATENCY_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.auth_latency = Duration::from_millis(parsed);
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_base_url(&self.api_base_url)
            .map(|_| ())
            .map_err(|_| SettingsError::InvalidBaseUrl(self.api_base_url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn defaults_select_mock_mode_with_fixed_latencies() {
        let settings = ClientSettings::default();
        assert_eq!(settings.api_mode, ApiMode::Mock);
        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert_eq!(settings.mock_latency, Duration::from_secs(2));
        assert_eq!(settings.auth_latency, Duration::from_secs(1));
    }

    #[test]
    fn file_then_env_layering() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "api_base_url = \"http://recipes.local:9000\"\napi_mode = \"live\"\nmock_latency_ms = 50"
        )
        .expect("write");

        let mut settings = ClientSettings::default();
        settings.apply_file(file.path()).expect("apply file");
        assert_eq!(settings.api_mode, ApiMode::Live);
        assert_eq!(settings.mock_latency, Duration::from_millis(50));

        let env: HashMap<&str, &str> = HashMap::from([
            ("APP__API_BASE_URL", "http://override:1234"),
            ("APP__API_MODE", "mock"),
            ("APP__AUTH_LATENCY_MS", "not-a-number"),
        ]);
        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_base_url, "http://override:1234");
        assert_eq!(settings.api_mode, ApiMode::Mock);
        assert_eq!(settings.auth_latency, Duration::from_secs(1));
        settings.validate().expect("valid");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_settings(Some(Path::new("/definitely/missing/client.toml")))
            .expect_err("must fail");
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "api_mode = \"sometimes\"").expect("write");
        let err = ClientSettings::default()
            .apply_file(file.path())
            .expect_err("must fail");
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let settings = ClientSettings {
            api_base_url: "::::".into(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn api_mode_accepts_real_alias() {
        assert_eq!("REAL".parse::<ApiMode>().expect("mode"), ApiMode::Live);
        assert!("sometimes".parse::<ApiMode>().is_err());
    }
}
