use serde::Deserialize;

/// Development-only signing secret. Must be overridden with `JWT_SECRET` in production.
pub const DEV_JWT_SECRET: &str = "super-secret-development-key-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub leeway_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.into(),
            issuer: "event-planner".into(),
            audience: "event-planner-clients".into(),
            ttl_minutes: 4 * 60,
            leeway_seconds: 2 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            jwt: JwtConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.jwt.secret);

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
            audience: lookup("JWT_AUDIENCE").unwrap_or(defaults.jwt.audience),
            ttl_minutes: parse_or(lookup("JWT_TTL_MINUTES"), defaults.jwt.ttl_minutes)?,
            leeway_seconds: parse_or(lookup("JWT_LEEWAY_SECONDS"), defaults.jwt.leeway_seconds)?,
        };
        anyhow::ensure!(jwt.ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("APP_PORT"), defaults.port)?,
            jwt,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt.secret == DEV_JWT_SECRET
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value {:?}: {}", v, e)),
        None => Ok(default),
    }
}
