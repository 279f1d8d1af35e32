/// 存储管理器启动
///
/// 会初始化进程级的日志和后台错误队列，因此单独放在一个测试二进制中

use std::collections::HashMap;
use common::bg_errors::{background_errors, BackgroundError};
use storage::{Config, StorageManager};

#[test]
fn test_bootstrap_applies_config() {
    let tmp = tempfile::tempdir().unwrap();
    let pools = format!("p1:directory:path={}", tmp.path().join("p1").display());
    let env = HashMap::from([
        ("LOG_LEVEL", "debug".to_string()),
        ("BG_ERROR_QUEUE_CAPACITY", "8".to_string()),
        ("STORAGE_POOLS", pools),
    ]);
    let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();
    assert_eq!(config.bg_error_queue_capacity, 8);

    let mut manager = StorageManager::bootstrap(&config).unwrap();

    let queue = background_errors();
    assert_eq!(queue.capacity(), 8);
    for i in 0..8 {
        assert!(queue.try_put(BackgroundError::new("test", i.to_string())).is_ok());
    }
    assert!(queue.try_put(BackgroundError::new("test", "overflow")).is_err());
    queue.clear();

    assert_eq!(manager.list_pools(), vec!["p1".to_string()]);
    manager.start_all().unwrap();
    assert!(manager.pool("p1").unwrap().is_pool_active());

    // 再次启动时保留已初始化的队列
    let second = Config::from_lookup(|key| match key {
        "BG_ERROR_QUEUE_CAPACITY" => Some("64".to_string()),
        _ => None,
    })
    .unwrap();
    StorageManager::bootstrap(&second).unwrap();
    assert_eq!(background_errors().capacity(), 8);
}
