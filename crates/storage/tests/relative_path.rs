/// 相对路径存储池
///
/// 会修改进程当前目录，因此单独放在一个测试二进制中

use std::collections::HashMap;
use storage::{DirectoryPool, StoragePool};

#[test]
fn test_relative_path_resolves_against_current_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(tmp.path()).unwrap();

    let config = HashMap::from([("path".to_string(), "rel".to_string())]);
    let mut pool = DirectoryPool::new("p1", &config).unwrap();
    let started = pool.pool_start();
    let locator = pool.create_volume("a", "qcow2");

    std::env::set_current_dir(previous).unwrap();

    started.unwrap();
    let expected = tmp.path().canonicalize().unwrap().join("rel");
    assert!(expected.is_dir());
    assert_eq!(pool.config().path, expected);
    assert_eq!(locator.unwrap(), format!("file:{}", expected.join("a").display()));
}
