use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub allowed_origins: Vec<String>,
    /// Report `NotFound` when an order update or delete matches no row.
    pub strict_existence: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );
        let strict_existence = env::var("ORDERS_STRICT_EXISTENCE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Ok(Self {
            port,
            database_url,
            host,
            max_connections,
            allowed_origins,
            strict_existence,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
