/// 存储卷描述模型
///
/// 存储池跟踪的卷记录，以及存储池/存储卷查询结果

use chrono::{DateTime, Utc};
use common::models::constants::FILE_LOCATOR_PREFIX;
use common::utils::format_size_human_readable;
use common::{PoolKind, PoolState, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 块设备挂载描述中的文件节点
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileNode {
    pub driver: String,
    pub filename: String,
}

/// 块设备挂载描述
///
/// 虚拟化层据此把卷挂载为设备：
/// `{"driver": <format>, "file": {"driver": "file", "filename": <path>}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachDescriptor {
    pub driver: String,
    pub file: FileNode,
}

impl AttachDescriptor {
    /// 文件协议驱动链，format 不做校验
    pub fn file(format: &str, path: &Path) -> Self {
        Self {
            driver: format.to_string(),
            file: FileNode {
                driver: "file".to_string(),
                filename: path.to_string_lossy().to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// 存储池跟踪的存储卷记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeRecord {
    /// 后端文件绝对路径
    pub path: PathBuf,
    /// 卷定位符，例如 file:/path/to/vol
    pub locator: String,
    pub descriptor: AttachDescriptor,
    pub format: String,
}

impl VolumeRecord {
    pub fn file(path: PathBuf, format: &str) -> Self {
        let locator = file_locator(&path);
        let descriptor = AttachDescriptor::file(format, &path);
        Self {
            path,
            locator,
            descriptor,
            format: format.to_string(),
        }
    }
}

/// 生成文件卷定位符
pub fn file_locator(path: &Path) -> String {
    format!("{}{}", FILE_LOCATOR_PREFIX, path.display())
}

/// 大小值：原始字节数或可读字符串
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SizeValue {
    Bytes(u64),
    Human(String),
}

impl SizeValue {
    pub fn new(bytes: u64, human: bool) -> Self {
        if human {
            Self::Human(format_size_human_readable(bytes, true))
        } else {
            Self::Bytes(bytes)
        }
    }

    pub fn as_bytes(&self) -> Option<u64> {
        match self {
            Self::Bytes(bytes) => Some(*bytes),
            Self::Human(_) => None,
        }
    }
}

/// 存储池容量统计
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolStat {
    pub capacity: SizeValue,
    pub available: SizeValue,
    pub allocation: SizeValue,
}

impl PoolStat {
    pub fn from_bytes(capacity: u64, available: u64, human: bool) -> Self {
        Self {
            capacity: SizeValue::new(capacity, human),
            available: SizeValue::new(available, human),
            allocation: SizeValue::new(capacity.saturating_sub(available), human),
        }
    }
}

/// 存储池详情
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolInfo {
    pub name: String,
    pub id: Uuid,
    pub kind: PoolKind,
    pub config: HashMap<String, String>,
    pub state: PoolState,
    pub source_list: Vec<String>,
    pub target_list: Vec<String>,
    #[serde(flatten)]
    pub stat: PoolStat,
}

/// 存储卷时间戳
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeTimestamps {
    pub atime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
}

/// 存储卷详细信息（verbose）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeDetails {
    pub size: SizeValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_size: Option<SizeValue>,
    /// 权限位
    pub mode: u32,
    pub owner: u32,
    pub group: u32,
    pub timestamp: VolumeTimestamps,
}

/// 存储卷信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeInfo {
    pub path: PathBuf,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub details: Option<VolumeDetails>,
}
