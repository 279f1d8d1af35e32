/// 配置管理

use anyhow::{anyhow, Context};
use common::models::constants::DEFAULT_BG_ERROR_CAPACITY;
use common::utils::parse_extra_params;
use common::{Error, PoolKind, Result};
use serde::Deserialize;

use crate::driver::PoolSpec;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub bg_error_queue_capacity: usize,
    /// 启动时注册的存储池
    pub pools: Vec<PoolSpec>,
}

impl Config {
    /// 从环境变量加载配置（会先读取 .env）
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过给定的查找函数加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(lookup).map_err(|e| Error::Config(format!("{:#}", e)))
    }

    fn load<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let bg_error_queue_capacity = match lookup("BG_ERROR_QUEUE_CAPACITY") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid BG_ERROR_QUEUE_CAPACITY: {}", raw))?,
            None => DEFAULT_BG_ERROR_CAPACITY,
        };

        let pools = match lookup("STORAGE_POOLS") {
            Some(raw) => parse_specs(&raw).context("invalid STORAGE_POOLS")?,
            None => Vec::new(),
        };

        Ok(Self {
            log_level,
            bg_error_queue_capacity,
            pools,
        })
    }
}

/// 解析存储池声明
///
/// 格式: `name:kind:key=value,key=value;name2:kind:...`
pub fn parse_pool_specs(raw: &str) -> Result<Vec<PoolSpec>> {
    parse_specs(raw).map_err(|e| Error::Config(format!("{:#}", e)))
}

fn parse_specs(raw: &str) -> anyhow::Result<Vec<PoolSpec>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let name = parts.next().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(anyhow!("missing pool name in STORAGE_POOLS entry: {}", entry));
            }

            let kind: PoolKind = parts
                .next()
                .ok_or_else(|| anyhow!("missing pool kind for pool {}", name))?
                .parse()
                .with_context(|| format!("invalid pool kind for pool {}", name))?;

            let config = parts.next().map(parse_extra_params).unwrap_or_default();

            Ok(PoolSpec {
                name: name.to_string(),
                kind,
                config,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bg_error_queue_capacity, DEFAULT_BG_ERROR_CAPACITY);
        assert!(config.pools.is_empty());
    }

    #[test]
    fn test_from_lookup() {
        let env = HashMap::from([
            ("LOG_LEVEL", "debug"),
            ("BG_ERROR_QUEUE_CAPACITY", "32"),
            ("STORAGE_POOLS", "p1:directory:path=/tmp/xyz; p2:dir:path=/var/lib/pool"),
        ]);
        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.bg_error_queue_capacity, 32);
        assert_eq!(config.pools.len(), 2);
        assert_eq!(config.pools[0].name, "p1");
        assert_eq!(config.pools[0].kind, PoolKind::Directory);
        assert_eq!(config.pools[0].config["path"], "/tmp/xyz");
        assert_eq!(config.pools[1].config["path"], "/var/lib/pool");
    }

    #[test]
    fn test_invalid_values() {
        let env = HashMap::from([("BG_ERROR_QUEUE_CAPACITY", "lots")]);
        match Config::from_lookup(|key| env.get(key).map(|v| v.to_string())) {
            Err(Error::Config(msg)) => assert!(msg.contains("BG_ERROR_QUEUE_CAPACITY")),
            other => panic!("unexpected result: {:?}", other),
        }

        let env = HashMap::from([("STORAGE_POOLS", "p1:ceph:path=/x")]);
        match Config::from_lookup(|key| env.get(key).map(|v| v.to_string())) {
            Err(Error::Config(msg)) => {
                assert!(msg.contains("STORAGE_POOLS"));
                assert!(msg.contains("p1"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(parse_pool_specs("p1:ceph:path=/x").is_err());
        assert!(parse_pool_specs("p1").is_err());
        assert!(parse_pool_specs(":directory:path=/x").is_err());
    }

    #[test]
    fn test_pool_without_params() {
        let specs = parse_pool_specs("p1:directory").unwrap();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].config.is_empty());
    }
}
