/// 共享数据模型
///
/// 定义存储池类型、状态等共享结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// 存储池后端类型
///
/// 构造存储池时通过该标签显式选择后端
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Directory,
}

impl PoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" => Ok(Self::Directory),
            // 未来可以添加更多后端类型
            // "nfs" => Ok(Self::Nfs),
            // "ceph" => Ok(Self::Ceph),
            other => Err(Error::InvalidArgument(format!(
                "Unsupported storage type: {}",
                other
            ))),
        }
    }
}

/// 存储池状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoolState {
    Active,
    Inactive,
}

impl PoolState {
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
        }
    }
}

/// 常量定义
pub mod constants {
    /// 卷文件定位符前缀
    pub const FILE_LOCATOR_PREFIX: &str = "file:";

    /// stat 中 st_blocks 的块大小
    pub const STAT_BLOCK_SIZE: u64 = 512;

    /// 后台错误队列默认容量
    pub const DEFAULT_BG_ERROR_CAPACITY: usize = 1024;
}
