use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::get_env;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PetStoreConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub jwt: JwtSettings,
    pub api_key: String,
    pub datastore: DatastoreSettings,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    /// Duration string: `30s`, `15m`, `12h`, `7d`, or bare seconds.
    pub expires_in: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatastoreSettings {
    pub region: String,
    /// `"AWS"` selects the regional DynamoDB endpoint; anything else is used
    /// verbatim (DynamoDB Local, proxies).
    pub endpoint: String,
    pub franchise_table: String,
    pub tenants_table: String,
    pub table_suffix: Option<String>,
}

impl PetStoreConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let env_str = env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Production;

        let config = PetStoreConfig {
            common,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("PetStore Monolith"), false)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            jwt: JwtSettings {
                // Secrets get no fallback in production; the process fails at
                // startup instead of signing tokens with a placeholder.
                secret: get_env("JWT_SECRET", Some("petstore-dev-secret"), is_prod)?,
                expires_in: get_env("JWT_EXPIRES_IN", Some("15m"), false)?,
                issuer: get_env("JWT_ISSUER", Some("petstore-api"), false)?,
                audience: get_env("JWT_AUDIENCE", Some("petstore-app"), false)?,
            },
            api_key: get_env("API_KEY", Some("petstore-dev-key"), is_prod)?,
            datastore: DatastoreSettings {
                region: get_env("AWS_REGION", Some("us-east-1"), false)?,
                endpoint: get_env("DYNAMODB_ENDPOINT", Some("AWS"), false)?,
                franchise_table: get_env("FRANCHISE_TABLE_NAME", Some("petstoreFranchise"), false)?,
                tenants_table: get_env("TENANTS_TABLE_NAME", Some("petstoreTenants"), false)?,
                table_suffix: env::var("ENV").ok().filter(|s| !s.is_empty()),
            },
            allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"), false)?
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        // Surfaces a malformed JWT_EXPIRES_IN at startup rather than on the
        // first token operation.
        parse_duration(&self.jwt.expires_in)?;

        if self.environment == Environment::Production
            && self.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl DatastoreSettings {
    pub fn franchise_table_name(&self) -> String {
        resolve_table_name(&self.franchise_table, self.table_suffix.as_deref())
    }

    pub fn tenants_table_name(&self) -> String {
        resolve_table_name(&self.tenants_table, self.table_suffix.as_deref())
    }

    pub fn resolved_endpoint(&self) -> String {
        if self.endpoint == "AWS" {
            format!("https://dynamodb.{}.amazonaws.com", self.region)
        } else {
            self.endpoint.clone()
        }
    }
}

fn resolve_table_name(base: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}-{}", base, suffix),
        None => base.to_string(),
    }
}

/// Parse a duration string of the form `30s`, `15m`, `12h`, `7d`, or bare
/// seconds into a [`chrono::Duration`]. Zero and negative values are invalid.
pub fn parse_duration(s: &str) -> Result<chrono::Duration, AppError> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .map(|idx| s.split_at(idx))
        .unwrap_or((s, "s"));

    let (value, unit) = split;
    let value: i64 = value.parse().map_err(|_| {
        AppError::ConfigError(anyhow::anyhow!("Invalid duration: {:?}", s))
    })?;

    let duration = match unit {
        "s" => chrono::Duration::seconds(value),
        "m" => chrono::Duration::minutes(value),
        "h" => chrono::Duration::hours(value),
        "d" => chrono::Duration::days(value),
        _ => {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid duration unit in {:?}",
                s
            )))
        }
    };

    if duration <= chrono::Duration::zero() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "Duration must be positive: {:?}",
            s
        )));
    }

    Ok(duration)
}
