use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::accounts::{Location, NewAccount, Role};
use crate::models::locations::CountrySeed;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        LmsError::cache_plugin_not_found(format!("Cache backend '{name}' not found in registry"))
    })?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
pub async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != "moka" => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to memory cache");
            let cache = build_cache("moka").await?;
            warn!("Successfully created fallback Moka (in-memory) cache backend");
            Ok(cache)
        }
        Err(e) => Err(e),
    }
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    let mut password: String = (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    // 保证满足密码强度要求
    password.push_str("Aa1");
    password
}

/// 初始化默认管理员账号
/// 数据库中没有任何账号时创建一个 Manager
pub async fn seed_manager(storage: &Arc<dyn Storage>) {
    match storage.count_accounts().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} account(s), skipping manager seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No accounts found in database, creating default manager account...");
        }
        Err(e) => {
            warn!("Failed to count accounts: {}, skipping manager seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated manager password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash manager password: {}, skipping manager seed", e);
            return;
        }
    };

    let seed = &AppConfig::get().seed;
    let account = NewAccount {
        username: seed.manager_username.clone(),
        email: seed.manager_email.clone(),
        password_hash,
        first_name: "Site".to_string(),
        last_name: "Manager".to_string(),
        role: Role::Manager,
        location: Location::default(),
    };

    match storage.create_account(account).await {
        Ok(member) => {
            info!(
                "Default manager account created successfully (ID: {}, username: {})",
                member.id(),
                member.account.username
            );
        }
        Err(e) => {
            warn!("Failed to create manager account: {}", e);
        }
    }
}

/// 读取地区参考数据文件
pub fn load_location_seeds(path: &str) -> Result<Vec<CountrySeed>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// 导入国家 / 省 / 区县参考数据，已存在的条目跳过
async fn seed_locations(storage: &Arc<dyn Storage>) {
    let path = AppConfig::get().seed.locations_file.trim();
    if path.is_empty() {
        debug!("No locations file configured, skipping location seed");
        return;
    }

    let seeds = match load_location_seeds(path) {
        Ok(seeds) => seeds,
        Err(e) => {
            warn!("Failed to read locations file {}: {}", path, e);
            return;
        }
    };

    match storage.seed_locations(seeds).await {
        Ok(0) => debug!("Location reference data already up to date"),
        Ok(added) => info!("Imported {} countries from {}", added, path),
        Err(e) => {
            warn!("Failed to import locations: {}", e);
            return;
        }
    }

    if let Ok(total) = storage.count_countries().await {
        debug!("{} countries available for profile completion", total);
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和初始数据
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_manager(&storage).await;
    seed_locations(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password_simple;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let password = generate_random_password(16);
            assert_eq!(password.len(), 19);
            assert!(validate_password_simple(&password).is_ok());
        }
    }

    #[test]
    fn test_missing_locations_file_is_file_error() {
        let err = load_location_seeds("/nonexistent/locations.json").unwrap_err();
        assert_eq!(err.code(), "E006");
    }
}
