use std::env;
use std::path::PathBuf;

const DEFAULT_MODEL_PATH: &str = "artifacts/model_data.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,

    // Scoring
    pub model_path: PathBuf,

    // Admin API bearer token (optional; admin routes are open when unset)
    pub api_token: Option<String>,

    // Populate demo data on an empty database
    pub seed_sample_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".into())
                .parse()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.into())
                .into(),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
        })
    }

    /// Returns true if the admin routes require a bearer token.
    pub fn admin_auth_enabled(&self) -> bool {
        self.api_token.is_some()
    }
}
