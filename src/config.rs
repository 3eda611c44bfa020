use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admin_user: String,
    pub admin_pass: String,
    pub upload_dir: String,
    pub table_count: i32,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_user = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_pass = env::var("ADMIN_PASS").unwrap_or_else(|_| "adminpass123".to_string());
        let upload_dir = env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "static/uploads".to_string());
        let table_count = env::var("TABLE_COUNT")
            .ok()
            .and_then(|t| t.parse::<i32>().ok())
            .unwrap_or(13);
        let max_upload_bytes = env::var("MAX_CONTENT_LENGTH")
            .ok()
            .and_then(|m| m.parse::<usize>().ok())
            .unwrap_or(104_857_600);
        Ok(Self {
            database_url,
            host,
            port,
            admin_user,
            admin_pass,
            upload_dir,
            table_count,
            max_upload_bytes,
        })
    }
}
