//! Server configuration loaded from environment variables.

use std::str::FromStr;

use kiroween_core::models::ResourceKind;
use kiroween_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Which generated app the server runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppProfile {
    /// Notes and spells.
    Grimoire,
    /// Tasks.
    Tasks,
    /// Health endpoint only.
    Skeleton,
    /// Every resource module.
    #[default]
    All,
}

impl AppProfile {
    /// Resource kinds mounted under `/api` for this profile.
    pub fn resources(self) -> &'static [ResourceKind] {
        match self {
            AppProfile::Grimoire => &[ResourceKind::Note, ResourceKind::Spell],
            AppProfile::Tasks => &[ResourceKind::Task],
            AppProfile::Skeleton => &[],
            AppProfile::All => &ResourceKind::ALL,
        }
    }
}

impl FromStr for AppProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grimoire" => Ok(AppProfile::Grimoire),
            "tasks" => Ok(AppProfile::Tasks),
            "skeleton" | "skeleton-core" => Ok(AppProfile::Skeleton),
            "all" => Ok(AppProfile::All),
            other => Err(format!(
                "unknown app profile '{other}' (expected grimoire, tasks, skeleton or all)"
            )),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: 3000).
    pub port: u16,
    pub database: DbConfig,
    pub profile: AppProfile,
    /// Maximum accepted request body in bytes (default: 1 MiB).
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            database: DbConfig::default(),
            profile: AppProfile::default(),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first so `.env` values are visible.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup. Unset
    /// variables fall back to [`ServerConfig::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => defaults.port,
        };
        let profile = match lookup("KIROWEEN_APP") {
            Some(raw) => raw.parse::<AppProfile>().map_err(|reason| ConfigError::Invalid {
                var: "KIROWEEN_APP",
                reason,
            })?,
            None => defaults.profile,
        };
        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => parse_var("BODY_LIMIT_BYTES", &raw)?,
            None => defaults.body_limit_bytes,
        };

        let database = DbConfig {
            url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
            namespace: lookup("DATABASE_NS").unwrap_or(defaults.database.namespace),
            database: lookup("DATABASE_DB").unwrap_or(defaults.database.database),
            username: lookup("DATABASE_USER"),
            password: lookup("DATABASE_PASS"),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database,
            profile,
            body_limit_bytes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.profile, AppProfile::All);
        assert_eq!(config.database.url, "mem://");
        assert!(config.database.username.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn variables_override_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("KIROWEEN_APP", "Grimoire"),
            ("DATABASE_URL", "ws://127.0.0.1:8000"),
            ("DATABASE_USER", "root"),
            ("DATABASE_PASS", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.profile, AppProfile::Grimoire);
        assert_eq!(config.database.url, "ws://127.0.0.1:8000");
        assert_eq!(config.database.username.as_deref(), Some("root"));
    }

    #[test]
    fn invalid_port_names_the_variable() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "seventy")])).unwrap_err();
        let ConfigError::Invalid { var, .. } = err;
        assert_eq!(var, "PORT");
    }

    #[test]
    fn unknown_profile_is_rejected() {
        assert!(ServerConfig::from_lookup(lookup_from(&[("KIROWEEN_APP", "shop")])).is_err());
    }

    #[test]
    fn profiles_mount_expected_resources() {
        assert_eq!(
            AppProfile::Grimoire.resources(),
            &[ResourceKind::Note, ResourceKind::Spell]
        );
        assert_eq!(AppProfile::Tasks.resources(), &[ResourceKind::Task]);
        assert!(AppProfile::Skeleton.resources().is_empty());
        assert_eq!(AppProfile::All.resources().len(), 3);
    }
}
