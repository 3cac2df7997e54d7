// src/app/config.rs
//
// Runtime configuration, read from STREAMVAULT_* environment variables.
// The CLI overrides individual fields after loading.

use std::path::PathBuf;
use std::time::Duration;

use crate::db::default_database_path;
use crate::error::{AppError, AppResult};
use crate::services::CachePolicies;

pub const ENV_BACKEND: &str = "STREAMVAULT_BACKEND";
pub const ENV_DB_PATH: &str = "STREAMVAULT_DB_PATH";
pub const ENV_SUPABASE_URL: &str = "STREAMVAULT_SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "STREAMVAULT_SUPABASE_KEY";
pub const ENV_SNAPSHOT: &str = "STREAMVAULT_SNAPSHOT";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Where catalog rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Sqlite {
        db_path: PathBuf,
        pool_size: u32,
    },
    Rest {
        url: String,
        api_key: String,
        timeout: Duration,
    },
    Memory {
        snapshot: PathBuf,
    },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Sqlite { .. } => "sqlite",
            BackendConfig::Rest { .. } => "rest",
            BackendConfig::Memory { .. } => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub cache: CachePolicies,
}

impl AppConfig {
    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let kind = var(ENV_BACKEND).unwrap_or_else(|| "sqlite".to_string());
        let backend = match kind.to_ascii_lowercase().as_str() {
            "sqlite" => BackendConfig::Sqlite {
                db_path: match var(ENV_DB_PATH) {
                    Some(path) => PathBuf::from(path),
                    None => default_database_path()?,
                },
                pool_size: DEFAULT_POOL_SIZE,
            },
            "rest" | "supabase" => BackendConfig::Rest {
                url: var(ENV_SUPABASE_URL)
                    .ok_or_else(|| AppError::Config(format!("{} is required for the rest backend", ENV_SUPABASE_URL)))?,
                api_key: var(ENV_SUPABASE_KEY)
                    .ok_or_else(|| AppError::Config(format!("{} is required for the rest backend", ENV_SUPABASE_KEY)))?,
                timeout: DEFAULT_HTTP_TIMEOUT,
            },
            "memory" => BackendConfig::Memory {
                snapshot: var(ENV_SNAPSHOT)
                    .map(PathBuf::from)
                    .ok_or_else(|| AppError::Config(format!("{} is required for the memory backend", ENV_SNAPSHOT)))?,
            },
            other => {
                return Err(AppError::Config(format!(
                    "Unknown backend '{}', expected sqlite, rest or memory",
                    other
                )))
            }
        };

        Ok(Self {
            backend,
            cache: CachePolicies::default(),
        })
    }
}
