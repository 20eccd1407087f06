//! Backend mode selection.
//!
//! Resolved once from the environment at startup; every hybrid repository is
//! constructed for the selected mode and never re-branches per call.

use std::path::PathBuf;

/// Which physical backend serves persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Remote PostgreSQL via sqlx.
    Remote,
    /// Local JSON key-value store on disk.
    Local,
}

impl BackendMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

/// Storage configuration loaded from environment variables.
///
/// | Env Var             | Meaning                                          |
/// |---------------------|--------------------------------------------------|
/// | `DEFTER_BACKEND`    | `remote` or `local`; overrides auto-detection    |
/// | `DATABASE_URL`      | Postgres URL; its presence selects remote mode   |
/// | `DEFTER_LOCAL_PATH` | Local store file (default `defter-store.json`)   |
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub mode: BackendMode,
    pub database_url: Option<String>,
    pub local_store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the backend mode and connection settings from the environment.
    ///
    /// An explicit `DEFTER_BACKEND` wins; otherwise remote mode is selected
    /// exactly when `DATABASE_URL` is set. An unrecognized `DEFTER_BACKEND`
    /// value falls back to auto-detection with a warning.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").ok();
        let local_store_path = std::env::var("DEFTER_LOCAL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("defter-store.json"));

        let auto = if database_url.is_some() {
            BackendMode::Remote
        } else {
            BackendMode::Local
        };

        let mode = match std::env::var("DEFTER_BACKEND").ok().as_deref() {
            Some("remote") => BackendMode::Remote,
            Some("local") => BackendMode::Local,
            Some(other) => {
                tracing::warn!(value = other, "Unrecognized DEFTER_BACKEND, auto-detecting");
                auto
            }
            None => auto,
        };

        Self {
            mode,
            database_url,
            local_store_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels() {
        assert_eq!(BackendMode::Remote.label(), "remote");
        assert_eq!(BackendMode::Local.label(), "local");
    }
}
