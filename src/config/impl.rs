use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用部署变量 -> 配置键
const ENV_ALIASES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("UPLOAD_DIR", "upload.dir"),
];

fn apply_aliases(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in ENV_ALIASES {
        builder = builder.set_override_option(*key, lookup(*var))?;
    }
    Ok(builder)
}

impl AppConfig {
    /// 依次读取 config.toml、config.<APP_ENV>.toml、EDUPRO_* 环境变量和常用别名
    pub fn load() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{profile}")).required(false))
            .add_source(
                Environment::with_prefix("EDUPRO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: AppConfig = apply_aliases(builder, |var| std::env::var(var).ok())?
            .build()?
            .try_deserialize()?;
        Ok(settings.resolve_workers())
    }

    fn resolve_workers(mut self) -> Self {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers).max(1);
        }
        self
    }

    /// 全局配置，首次访问时加载，加载失败直接退出进程
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| match Self::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            }
        })
    }

    /// 启动时显式加载，重复调用返回错误
    pub fn init() -> Result<(), ConfigError> {
        APP_CONFIG
            .set(Self::load()?)
            .map_err(|_| ConfigError::Message("Configuration already initialized".into()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sources_use_defaults() {
        let config: AppConfig = Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("defaults should deserialize");
        assert_eq!(config.app.login_path, "/accounts/login/");
        assert_eq!(config.cache.cache_type, "moka");
        assert!(config.upload.allowed_video_types.contains(&"mp4".to_string()));
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_aliases_override_nested_keys() {
        let lookup = |var: &str| match var {
            "SERVER_PORT" => Some("9090".to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        };
        let config: AppConfig = apply_aliases(Config::builder(), lookup)
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("aliases should deserialize");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_workers_resolved() {
        let config = AppConfig::default().resolve_workers();
        assert!(config.server.workers >= 1);
        assert!(config.server.workers <= config.server.max_workers);
    }
}
