//! Settings at ~/.config/sheetbridge/config.toml, overridable from the
//! environment.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SheetsError, SheetsResult};
use crate::service::{DEFAULT_DATA_START_ROW, DEFAULT_RECORD_SHEET};

/// Prefix of environment overrides, e.g. `SHEETBRIDGE_SPREADSHEET_ID`.
pub const ENV_PREFIX: &str = "SHEETBRIDGE";

/// Older unprefixed variables, read with the lowest priority.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("GOOGLE_SHEET_ID", "spreadsheet_id"),
    ("GOOGLE_CLIENT_EMAIL", "client_email"),
    ("GOOGLE_PRIVATE_KEY", "private_key"),
    ("SHEET_NAME", "record_sheet"),
];

fn default_record_sheet() -> String {
    DEFAULT_RECORD_SHEET.to_string()
}

fn default_data_start_row() -> u32 {
    DEFAULT_DATA_START_ROW
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_server_port() -> u16 {
    4097
}

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub spreadsheet_id: Option<String>,

    /// Service account (or authorized user) JSON key file.
    pub credentials_path: Option<PathBuf>,

    pub client_email: Option<String>,
    pub private_key: Option<String>,

    #[serde(default = "default_record_sheet")]
    pub record_sheet: String,

    /// 1-based sheet row of the first record, below the header.
    #[serde(default = "default_data_start_row")]
    pub data_start_row: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("credentials_path", &self.credentials_path)
            .field("client_email", &self.client_email)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("record_sheet", &self.record_sheet)
            .field("data_start_row", &self.data_start_row)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Settings {
    pub fn config_path() -> SheetsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SheetsError::Config("Could not determine config directory".into()))?
            .join("sheetbridge");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the config file and the process environment, creating a
    /// commented-out config file on first run.
    pub fn load() -> SheetsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::build(Some(&config_path), std::env::vars().collect())
    }

    /// Merge, lowest priority first: legacy variables, the file at `path`,
    /// then `SHEETBRIDGE_*` variables from `env`.
    pub fn build(path: Option<&Path>, env: HashMap<String, String>) -> SheetsResult<Self> {
        let mut builder = Config::builder();

        for (var, key) in LEGACY_ENV {
            if let Some(value) = env.get(var) {
                builder = builder
                    .set_default(key, value.as_str())
                    .map_err(|e| SheetsError::Config(e.to_string()))?;
            }
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .source(Some(env))
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SheetsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SheetsError::Config(e.to_string()))
    }

    /// Fail with every missing required setting named at once.
    pub fn validate(&self) -> SheetsResult<()> {
        let mut missing = Vec::new();

        if self.spreadsheet_id.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("spreadsheet_id");
        }
        if self.credentials_path.is_none() {
            if self.client_email.is_none() {
                missing.push("client_email (or credentials_path)");
            }
            if self.private_key.is_none() {
                missing.push("private_key (or credentials_path)");
            }
        }
        if self.data_start_row == 0 {
            return Err(SheetsError::Config("data_start_row must be at least 1".into()));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SheetsError::Config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn spreadsheet_id(&self) -> SheetsResult<&str> {
        self.spreadsheet_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SheetsError::Config("Missing required settings: spreadsheet_id".into()))
    }

    /// The private key with escaped `\n` sequences turned into newlines, as
    /// it arrives when passed through a single-line environment variable.
    pub fn private_key(&self) -> Option<String> {
        self.private_key.as_ref().map(|key| key.replace("\\n", "\n"))
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.as_ref().map(|path| {
            PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SheetsResult<()> {
        let contents = format!(
            "\
# sheetbridge configuration

# The spreadsheet to work on (the id in its URL):
# spreadsheet_id = \"1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms\"

# Service account key downloaded from the Google Cloud console:
# credentials_path = \"~/.config/sheetbridge/service-account.json\"

# Sheet holding id/name/email/role records, and the first data row:
# record_sheet = \"{}\"
# data_start_row = {}

# request_timeout_secs = {}
# server_port = {}
",
            DEFAULT_RECORD_SHEET,
            DEFAULT_DATA_START_ROW,
            default_request_timeout_secs(),
            default_server_port(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SheetsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SheetsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
