use anyhow::anyhow;
use chrono::NaiveTime;
use chrono_tz::Tz;
use std::{
    env,
    path::{Path, PathBuf},
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_JWT_SECRET: &str = "hrms-development-secret-change-me";
const DEFAULT_DATABASE_URL: &str = "memory://";
/// Upper bound for `JWT_EXPIRATION_HOURS`: one year.
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 365;

/// Deployment environment, taken from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    /// Allowed CORS origins. Empty means any origin.
    pub frontend_origins: Vec<String>,
    pub frontend_dist_dir: PathBuf,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub time_zone: Tz,
    pub workday_start: NaiveTime,
    pub body_limit_bytes: Option<usize>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("Invalid PORT value: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let environment = var("NODE_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Environment::Development);

        let frontend_origins = var("FRONTEND_URL")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let frontend_dist_dir = var("FRONTEND_DIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_dist_dir);

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let jwt_expiration_hours = match var("JWT_EXPIRATION_HOURS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|hours| (1..=MAX_JWT_EXPIRATION_HOURS).contains(hours))
                .ok_or_else(|| {
                    anyhow!(
                        "Invalid JWT_EXPIRATION_HOURS value (expected 1-{}): {}",
                        MAX_JWT_EXPIRATION_HOURS,
                        raw
                    )
                })?,
            None => 24,
        };

        let time_zone_name = var("APP_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let workday_start = match var("WORKDAY_START") {
            Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
                .map_err(|_| anyhow!("Invalid WORKDAY_START value (expected HH:MM): {}", raw))?,
            None => NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        };

        let body_limit_bytes = match var("BODY_LIMIT_BYTES") {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| anyhow!("Invalid BODY_LIMIT_BYTES value: {}", raw))?,
            ),
            None => None,
        };

        Ok(Config {
            port,
            environment,
            frontend_origins,
            frontend_dist_dir,
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            time_zone,
            workday_start,
            body_limit_bytes,
            admin_email: var("ADMIN_EMAIL").map(|email| email.to_lowercase()),
            admin_password: var("ADMIN_PASSWORD"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn allows_any_origin(&self) -> bool {
        self.frontend_origins.is_empty()
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn frontend_index(&self) -> PathBuf {
        self.frontend_dist_dir.join("index.html")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

fn default_dist_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("dist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.allows_any_origin());
        assert_eq!(config.database_url, "memory://");
        assert!(config.uses_default_jwt_secret());
        assert_eq!(config.jwt_expiration_hours, 24);
        assert_eq!(config.time_zone, chrono_tz::UTC);
        assert_eq!(config.workday_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(config.body_limit_bytes.is_none());
        assert!(config.frontend_dist_dir.ends_with("dist"));
    }

    #[test]
    fn reads_port_environment_and_origins() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("NODE_ENV", "production"),
            ("FRONTEND_URL", "https://hr.example.com/, https://admin.example.com"),
        ])
        .expect("config");
        assert_eq!(config.port, 8080);
        assert!(config.is_production());
        assert_eq!(
            config.frontend_origins,
            vec!["https://hr.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn wildcard_frontend_url_means_any_origin() {
        let config = config_from(&[("FRONTEND_URL", "*")]).expect("config");
        assert!(config.allows_any_origin());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).expect_err("invalid port");
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn jwt_expiration_must_be_within_bounds() {
        let config = config_from(&[("JWT_EXPIRATION_HOURS", "48")]).expect("config");
        assert_eq!(config.jwt_expiration_hours, 48);

        for raw in ["0", "abc", "-5", "100000000000"] {
            let err = config_from(&[("JWT_EXPIRATION_HOURS", raw)]).expect_err(raw);
            assert!(err.to_string().contains("JWT_EXPIRATION_HOURS"), "value {raw}");
        }
    }

    #[test]
    fn invalid_timezone_is_rejected() {
        let err = config_from(&[("APP_TIMEZONE", "Mars/Olympus")]).expect_err("invalid tz");
        assert!(err.to_string().contains("APP_TIMEZONE"));
    }

    #[test]
    fn workday_start_parses_hours_and_minutes() {
        let config = config_from(&[("WORKDAY_START", "08:30")]).expect("config");
        assert_eq!(config.workday_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert!(config_from(&[("WORKDAY_START", "8am")]).is_err());
    }

    #[test]
    fn environment_parse_is_lenient() {
        assert_eq!(Environment::parse("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    fn admin_email_is_lowercased() {
        let config = config_from(&[("ADMIN_EMAIL", "Root@Example.com"), ("ADMIN_PASSWORD", "pw")])
            .expect("config");
        assert_eq!(config.admin_email.as_deref(), Some("root@example.com"));
        assert_eq!(config.admin_password.as_deref(), Some("pw"));
    }
}
