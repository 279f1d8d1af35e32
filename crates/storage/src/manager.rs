/// 存储管理器
///
/// 根据后端类型标签创建存储池，并按名称管理已注册的存储池

use common::bg_errors::init_background_errors;
use common::logging::init_tracing;
use common::{Error, PoolKind, Result};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::directory::DirectoryPool;
use crate::driver::{PoolSpec, StoragePool};

/// 按后端类型创建存储池
pub fn create_pool(
    kind: PoolKind,
    name: &str,
    config: &HashMap<String, String>,
) -> Result<Box<dyn StoragePool>> {
    let pool: Box<dyn StoragePool> = match kind {
        PoolKind::Directory => Box::new(DirectoryPool::new(name, config)?),
        // 未来可以添加更多后端类型
        // PoolKind::Nfs => Box::new(NfsPool::new(name, config)?),
    };
    Ok(pool)
}

/// 存储管理器
///
/// 单一所有者，修改操作需要 `&mut self`，跨线程共享时由调用方自行串行化
#[derive(Default)]
pub struct StorageManager {
    /// 存储池映射: pool name -> pool
    pools: HashMap<String, Box<dyn StoragePool>>,
}

impl StorageManager {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// 按配置初始化日志和后台错误队列，并注册声明的存储池（不激活）
    pub fn bootstrap(config: &Config) -> Result<Self> {
        init_tracing(&config.log_level);

        if !init_background_errors(config.bg_error_queue_capacity) {
            warn!(
                "Background error queue already initialized, ignoring capacity {}",
                config.bg_error_queue_capacity
            );
        }

        Self::from_config(config)
    }

    /// 按配置注册所有声明的存储池（不激活）
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut manager = Self::new();
        for spec in &config.pools {
            manager.register_pool(spec.clone())?;
        }
        Ok(manager)
    }

    /// 注册存储池
    pub fn register_pool(&mut self, spec: PoolSpec) -> Result<()> {
        info!("Registering storage pool: {} (type: {})", spec.name, spec.kind);

        if self.pools.contains_key(&spec.name) {
            return Err(Error::AlreadyExists(format!(
                "Storage pool {} already registered",
                spec.name
            )));
        }

        let pool = create_pool(spec.kind, &spec.name, &spec.config)?;
        self.pools.insert(spec.name, pool);

        Ok(())
    }

    /// 获取存储池
    pub fn pool(&self, name: &str) -> Result<&dyn StoragePool> {
        match self.pools.get(name) {
            Some(pool) => Ok(pool.as_ref()),
            None => Err(Error::NotFound(format!("Storage pool {} not found", name))),
        }
    }

    pub fn pool_mut(&mut self, name: &str) -> Result<&mut dyn StoragePool> {
        match self.pools.get_mut(name) {
            Some(pool) => Ok(pool.as_mut()),
            None => Err(Error::NotFound(format!("Storage pool {} not found", name))),
        }
    }

    /// 注销存储池，不触碰后端资源
    pub fn remove_pool(&mut self, name: &str) -> Result<Box<dyn StoragePool>> {
        debug!("Removing storage pool: {}", name);
        self.pools
            .remove(name)
            .ok_or_else(|| Error::NotFound(format!("Storage pool {} not found", name)))
    }

    /// 检查存储池是否已注册
    pub fn is_pool_registered(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// 获取已注册的存储池列表（按名称排序）
    pub fn list_pools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pools.keys().cloned().collect();
        names.sort();
        names
    }

    /// 激活所有存储池
    ///
    /// 逐个尝试激活，返回遇到的第一个错误
    pub fn start_all(&mut self) -> Result<()> {
        let mut first_error = None;

        for (name, pool) in self.pools.iter_mut() {
            if let Err(e) = pool.pool_start() {
                error!("Failed to start storage pool {}: {}", name, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_spec(name: &str, path: &std::path::Path) -> PoolSpec {
        PoolSpec {
            name: name.to_string(),
            kind: PoolKind::Directory,
            config: HashMap::from([("path".to_string(), path.to_string_lossy().to_string())]),
        }
    }

    #[test]
    fn test_create_pool_by_kind() {
        let config = HashMap::from([("path".to_string(), "/tmp/xyz".to_string())]);
        let pool = create_pool(PoolKind::Directory, "p1", &config).unwrap();
        assert_eq!(pool.name(), "p1");
        assert_eq!(pool.kind(), PoolKind::Directory);
        assert!(!pool.is_pool_active());
    }

    #[test]
    fn test_create_pool_invalid_config() {
        let err = create_pool(PoolKind::Directory, "p1", &HashMap::new()).err().unwrap();
        assert!(matches!(err, Error::PoolConfig(_)));
    }

    #[test]
    fn test_register_and_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let mut manager = StorageManager::new();
        manager.register_pool(dir_spec("b", &tmp.path().join("b"))).unwrap();
        manager.register_pool(dir_spec("a", &tmp.path().join("a"))).unwrap();

        assert_eq!(manager.list_pools(), vec!["a".to_string(), "b".to_string()]);
        assert!(manager.is_pool_registered("a"));
        assert!(matches!(manager.pool("c"), Err(Error::NotFound(_))));

        let err = manager
            .register_pool(dir_spec("a", &tmp.path().join("other")))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_start_all_and_volume_ops() {
        let tmp = tempfile::tempdir().unwrap();
        let mut manager = StorageManager::new();
        manager.register_pool(dir_spec("p1", &tmp.path().join("p1"))).unwrap();
        manager.start_all().unwrap();

        let pool = manager.pool_mut("p1").unwrap();
        let locator = pool.create_volume("a", "qcow2").unwrap();
        assert!(locator.starts_with("file:"));
        assert!(locator.ends_with("/p1/a"));
        assert!(manager.pool("p1").unwrap().is_volume_existing("a"));

        let removed = manager.remove_pool("p1").unwrap();
        assert!(removed.is_pool_active());
        assert!(!manager.is_pool_registered("p1"));
    }

    #[test]
    fn test_start_all_reports_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut manager = StorageManager::new();
        manager.register_pool(dir_spec("ok", &tmp.path().join("ok"))).unwrap();
        manager
            .register_pool(dir_spec("bad", &tmp.path().join("missing").join("bad")))
            .unwrap();

        assert!(matches!(manager.start_all(), Err(Error::Io(_))));
        assert!(manager.pool("ok").unwrap().is_pool_active());
        assert!(!manager.pool("bad").unwrap().is_pool_active());
    }

    #[test]
    fn test_from_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            log_level: "info".to_string(),
            bg_error_queue_capacity: 16,
            pools: vec![dir_spec("p1", tmp.path())],
        };
        let manager = StorageManager::from_config(&config).unwrap();
        assert_eq!(manager.list_pools(), vec!["p1".to_string()]);
    }
}
