use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::Duration;

/// Session secrets that only exist for local development.
pub const PLACEHOLDER_SECRETS: &[&str] = &["dev-secret-change-me", "change-me-to-a-random-string"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub session_ttl: Duration,
    /// `(username, password)` of the root administrator to create at startup.
    pub root: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("FUNDWELL_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("FUNDWELL_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("FUNDWELL_PORT must be a port number")?;
        let db_path: PathBuf = var("FUNDWELL_DB_PATH")
            .unwrap_or_else(|| "fundwell.db".into())
            .into();
        let session_secret = var("FUNDWELL_SESSION_SECRET").unwrap_or_else(|| "dev-secret-change-me".into());
        let session_ttl_hours: i64 = var("FUNDWELL_SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .context("FUNDWELL_SESSION_TTL_HOURS must be a whole number of hours")?;
        let session_ttl = Duration::try_hours(session_ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| anyhow!("FUNDWELL_SESSION_TTL_HOURS out of range: {}", session_ttl_hours))?;

        let root = match (var("FUNDWELL_ROOT_USERNAME"), var("FUNDWELL_ROOT_PASSWORD")) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            session_secret,
            session_ttl,
            root,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&self.session_secret.as_str())
    }
}
