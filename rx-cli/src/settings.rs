use anyhow::Result;
use config::{Config, ConfigError, Environment, File, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, path::Path};
use url::Url;

use crate::paths::config_file;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend, without the `/api/v1` part
    pub api_endpoint: Url,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: Url::parse("http://localhost:8000").expect("Valid hardcoded server URL"),
        }
    }
}

impl Settings {
    /// Load settings from defaults, the config file and `RX_*` environment variables,
    /// in that order of precedence.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file())
    }

    /// Like [`Settings::load`], with an explicit config file path.
    /// A missing file is fine.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading settings");

        let s = Config::builder()
            .add_source(DefaultImplSource::<Settings>::new())
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("RX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

// `config` has no notion of a `Default` impl, so we serialize
// `T::default()` into a `toml::Value` and convert that into
// the `config::Value` tree the builder understands.

struct DefaultImplSource<T: Default>(PhantomData<T>);

impl<T: Default> Clone for DefaultImplSource<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Default> std::fmt::Debug for DefaultImplSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DefaultImplSource").finish()
    }
}

impl<T: Default> DefaultImplSource<T> {
    fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Default + Serialize + Send + Sync + 'static> Source for DefaultImplSource<T> {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        let toml_value =
            toml::Value::try_from(T::default()).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        match from_toml_value(&toml_value).kind {
            ValueKind::Table(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

fn from_toml_value(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(value) => Value::new(None, value.to_string()),
        toml::Value::Float(value) => Value::new(None, *value),
        toml::Value::Integer(value) => Value::new(None, *value),
        toml::Value::Boolean(value) => Value::new(None, *value),
        toml::Value::Table(table) => Value::new(
            None,
            table
                .iter()
                .map(|(key, value)| (key.clone(), from_toml_value(value)))
                .collect::<Map<_, _>>(),
        ),
        toml::Value::Array(array) => {
            Value::new(None, array.iter().map(from_toml_value).collect::<Vec<_>>())
        }
        toml::Value::Datetime(datetime) => Value::new(None, datetime.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};
    use testresult::TestResult;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rx-cli-{}-{name}", std::process::id()))
    }

    #[test_log::test]
    fn test_defaults_without_config_file() -> TestResult {
        let settings = Settings::load_from(&scratch_file("missing.toml"))?;
        assert_eq!(settings.api_endpoint.as_str(), "http://localhost:8000/");
        Ok(())
    }

    #[test_log::test]
    fn test_config_file_overrides_defaults() -> TestResult {
        let path = scratch_file("config.toml");
        fs::write(&path, "api_endpoint = \"https://api.example.test\"\n")?;

        let settings = Settings::load_from(&path);
        fs::remove_file(&path)?;

        assert_eq!(settings?.api_endpoint.as_str(), "https://api.example.test/");
        Ok(())
    }
}
