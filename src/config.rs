use std::env;
use std::fs;
use std::path::PathBuf;

use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::domain::user::Session;
use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_token: Option<String>,
    pub realtime_url: Option<String>,
    pub session: Session,
}

/// Values persisted by `helpdesk config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub api_base_url: Option<String>,
    pub session_token: Option<String>,
    pub realtime_url: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::from_sources(stored, |key| env::var(key).ok()))
    }

    /// Environment values win over stored ones. Blank values count as unset.
    pub fn from_sources(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, stored: Option<String>| non_blank(lookup(key)).or(non_blank(stored));

        let api_base_url = pick("HELPDESK_API_URL", stored.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_token = pick("HELPDESK_TOKEN", stored.session_token);
        let realtime_url = pick("HELPDESK_REALTIME_URL", stored.realtime_url);

        let claims = session_token
            .as_deref()
            .and_then(decode_token_claims)
            .unwrap_or_default();
        let session = Session {
            user_id: pick("HELPDESK_USER_ID", stored.user_id).or(claims.user_id),
            username: pick("HELPDESK_USERNAME", stored.username).or(claims.username),
        };

        Self {
            api_base_url,
            session_token,
            realtime_url,
            session,
        }
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    directories::ProjectDirs::from("dev", "helpdesk", "helpdesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            AppError::Configuration("cannot determine configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
struct TokenClaims {
    #[serde(alias = "_id", alias = "sub")]
    id: Option<String>,
    username: Option<String>,
}

/// Reads the user claims from a JWT payload. The signature is not checked;
/// the server remains the authority on who the token belongs to.
fn decode_token_claims(token: &str) -> Option<Session> {
    let payload = token.split('.').nth(1)?;
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    Some(Session {
        user_id: claims.id,
        username: claims.username,
    })
}
