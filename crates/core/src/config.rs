//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Request
//! handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_MEDICATION_DATA_DIR, DEFAULT_REST_ADDR, MEDICATIONS_DIR_NAME};
use crate::{MedicationError, MedicationResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Deployment environment. Outside production, error responses carry diagnostic details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = MedicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(MedicationError::InvalidInput(format!(
                "unknown environment '{}' (expected development, test, staging or production)",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

/// Which repository backend to run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for StorageBackend {
    type Err = MedicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            other => Err(MedicationError::InvalidInput(format!(
                "unknown storage backend '{}' (expected memory or file)",
                other
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: String,
    environment: Environment,
    storage: StorageBackend,
    data_dir: PathBuf,
    api_key: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        rest_addr: String,
        environment: Environment,
        storage: StorageBackend,
        data_dir: PathBuf,
        api_key: Option<String>,
    ) -> MedicationResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(MedicationError::InvalidInput(
                "rest_addr cannot be empty".into(),
            ));
        }

        if data_dir.as_os_str().is_empty() {
            return Err(MedicationError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            rest_addr,
            environment,
            storage,
            data_dir,
            api_key,
        })
    }

    /// Build a configuration from already-read environment values.
    ///
    /// Each argument is the raw value of the matching variable (`None` when unset). Empty or
    /// whitespace values fall back to the defaults.
    pub fn from_env_values(
        rest_addr: Option<String>,
        environment: Option<String>,
        storage: Option<String>,
        data_dir: Option<String>,
        api_key: Option<String>,
    ) -> MedicationResult<Self> {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let rest_addr = non_empty(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let environment = non_empty(environment)
            .map(|v| v.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();
        let storage = non_empty(storage)
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or_default();
        let data_dir = non_empty(data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDICATION_DATA_DIR));

        Self::new(rest_addr, environment, storage, data_dir, api_key)
    }

    /// Read `MEDICATION_REST_ADDR`, `MEDICATION_ENV`, `MEDICATION_STORAGE`,
    /// `MEDICATION_DATA_DIR` and `API_KEY` from the process environment.
    ///
    /// Intended to be called exactly once, from a binary's `main`.
    pub fn from_env() -> MedicationResult<Self> {
        Self::from_env_values(
            std::env::var("MEDICATION_REST_ADDR").ok(),
            std::env::var("MEDICATION_ENV").ok(),
            std::env::var("MEDICATION_STORAGE").ok(),
            std::env::var("MEDICATION_DATA_DIR").ok(),
            std::env::var("API_KEY").ok(),
        )
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn storage(&self) -> StorageBackend {
        self.storage
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn medications_dir(&self) -> PathBuf {
        self.data_dir.join(MEDICATIONS_DIR_NAME)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rest_addr: DEFAULT_REST_ADDR.into(),
            environment: Environment::default(),
            storage: StorageBackend::default(),
            data_dir: PathBuf::from(DEFAULT_MEDICATION_DATA_DIR),
            api_key: None,
        }
    }
}
