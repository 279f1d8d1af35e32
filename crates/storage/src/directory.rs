/// 目录存储池
///
/// 在本地目录中管理卷文件（qcow2/raw 等），卷文件本身由外部镜像工具生成

use chrono::{DateTime, Utc};
use common::models::constants::STAT_BLOCK_SIZE;
use common::{Error, PoolKind, PoolState, Result};
use nix::sys::statvfs::statvfs;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::driver::StoragePool;
use crate::volume::{
    PoolInfo, PoolStat, SizeValue, VolumeDetails, VolumeInfo, VolumeRecord, VolumeTimestamps,
};

/// 目录存储池配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPoolConfig {
    /// 存储目录，激活后替换为规范化的绝对路径
    pub path: PathBuf,
}

impl DirectoryPoolConfig {
    pub const PATH: &'static str = "path";

    /// 校验配置：必须且只能包含 `path`
    pub fn parse(config: &HashMap<String, String>) -> Result<Self> {
        let mut unexpected: Vec<&str> = config
            .keys()
            .map(String::as_str)
            .filter(|key| *key != Self::PATH)
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            return Err(Error::PoolConfig(format!(
                "required field: path, but DirectoryPool got unexpected parameter(s): '{}'",
                unexpected.join("', '")
            )));
        }

        let path = config.get(Self::PATH).ok_or_else(|| {
            Error::PoolConfig(
                "required field: path, but DirectoryPool is missing required parameter 'path'"
                    .to_string(),
            )
        })?;

        if path.trim().is_empty() {
            return Err(Error::PoolConfig(
                "required field: path, but parameter 'path' is empty".to_string(),
            ));
        }

        Ok(Self {
            path: PathBuf::from(path),
        })
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([(
            Self::PATH.to_string(),
            self.path.to_string_lossy().to_string(),
        )])
    }
}

/// 目录存储池
#[derive(Debug)]
pub struct DirectoryPool {
    name: String,
    id: Uuid,
    config: DirectoryPoolConfig,
    source_list: Vec<String>,
    target_list: Vec<String>,
    active: bool,
    /// 存储卷映射: volume name -> record
    volumes: HashMap<String, VolumeRecord>,
}

impl DirectoryPool {
    /// 创建新的目录存储池实例，配置不合法时不会返回存储池
    pub fn new(name: impl Into<String>, config: &HashMap<String, String>) -> Result<Self> {
        Self::with_lists(name, config, Vec::new(), Vec::new())
    }

    pub fn with_lists(
        name: impl Into<String>,
        config: &HashMap<String, String>,
        source_list: Vec<String>,
        target_list: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        let config = DirectoryPoolConfig::parse(config)?;

        debug!("Constructed directory pool {} at {:?}", name, config.path);

        Ok(Self {
            name,
            id: common::utils::generate_id(),
            config,
            source_list,
            target_list,
            active: false,
            volumes: HashMap::new(),
        })
    }

    pub fn config(&self) -> &DirectoryPoolConfig {
        &self.config
    }

    /// 查找已跟踪的存储卷，不存在时返回 None，不会插入
    pub fn volume(&self, name: &str) -> Option<&VolumeRecord> {
        self.volumes.get(name)
    }

    fn require_active(&self, operation: &str) -> Result<()> {
        if self.active {
            Ok(())
        } else {
            Err(Error::pool_inactive(&self.name, operation))
        }
    }

    /// 获取卷的完整路径
    fn volume_path(&self, name: &str) -> PathBuf {
        self.config.path.join(name)
    }

    fn tracked(&self, name: &str) -> Result<&VolumeRecord> {
        self.volumes
            .get(name)
            .ok_or_else(|| Error::volume_not_found(&self.name, name))
    }

    /// 读取卷文件元数据，文件缺失或不是普通文件时视为卷不存在
    fn backing_metadata(&self, name: &str, path: &Path) -> Result<fs::Metadata> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Ok(metadata),
            Ok(_) => Err(Error::volume_not_found(&self.name, name)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::volume_not_found(&self.name, name))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// 卷名只能是目录下的单级文件名
fn validate_volume_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(Error::InvalidArgument(format!(
            "Invalid volume name: {:?}",
            name
        )));
    }
    Ok(())
}

fn unix_time(secs: i64, nsecs: i64) -> DateTime<Utc> {
    match DateTime::from_timestamp(secs, nsecs as u32) {
        Some(time) => time,
        None => {
            warn!("Timestamp out of range: secs={}, nsecs={}", secs, nsecs);
            DateTime::default()
        }
    }
}

impl StoragePool for DirectoryPool {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> PoolKind {
        PoolKind::Directory
    }

    fn source_list(&self) -> &[String] {
        &self.source_list
    }

    fn target_list(&self) -> &[String] {
        &self.target_list
    }

    fn pool_info(&self) -> Result<PoolInfo> {
        self.require_active("pool_info")?;

        Ok(PoolInfo {
            name: self.name.clone(),
            id: self.id,
            kind: self.kind(),
            config: self.config.to_map(),
            state: PoolState::from_active(self.active),
            source_list: self.source_list.clone(),
            target_list: self.target_list.clone(),
            stat: self.pool_stat(true)?,
        })
    }

    fn pool_stat(&self, human: bool) -> Result<PoolStat> {
        self.require_active("pool_stat")?;

        let stat = statvfs(self.config.path.as_path()).map_err(io::Error::from)?;
        let fragment_size = stat.fragment_size() as u64;
        let capacity = fragment_size * stat.blocks() as u64;
        let available = fragment_size * stat.blocks_available() as u64;

        Ok(PoolStat::from_bytes(capacity, available, human))
    }

    fn get_vol_info(&self, name: &str, verbose: bool, human: bool) -> Result<VolumeInfo> {
        self.require_active("get_vol_info")?;
        debug!("Getting volume info: pool={}, volume={}", self.name, name);

        let record = self.tracked(name)?;
        let metadata = self.backing_metadata(name, &record.path)?;

        if !verbose {
            return Ok(VolumeInfo {
                path: record.path.clone(),
                details: None,
            });
        }

        let details = VolumeDetails {
            size: SizeValue::new(metadata.size(), human),
            allocated_size: Some(SizeValue::new(metadata.blocks() * STAT_BLOCK_SIZE, human)),
            mode: metadata.mode() & 0o7777,
            owner: metadata.uid(),
            group: metadata.gid(),
            timestamp: VolumeTimestamps {
                atime: unix_time(metadata.atime(), metadata.atime_nsec()),
                mtime: unix_time(metadata.mtime(), metadata.mtime_nsec()),
                ctime: unix_time(metadata.ctime(), metadata.ctime_nsec()),
            },
        };

        Ok(VolumeInfo {
            path: record.path.clone(),
            details: Some(details),
        })
    }

    fn pool_list_vols(&self, verbose: bool, human: bool) -> Result<BTreeMap<String, VolumeInfo>> {
        self.require_active("pool_list_vols")?;
        debug!("Listing volumes in pool {}", self.name);

        self.volumes
            .keys()
            .map(|name| -> Result<(String, VolumeInfo)> {
                Ok((name.clone(), self.get_vol_info(name, verbose, human)?))
            })
            .collect()
    }

    fn build(&mut self) -> Result<()> {
        let path = if self.config.path.is_absolute() {
            self.config.path.clone()
        } else {
            std::env::current_dir()?.join(&self.config.path)
        };

        // 只创建一级目录，父目录缺失直接报错
        if !path.is_dir() {
            info!("Creating pool directory {:?}", path);
            fs::create_dir(&path)?;
        }

        self.config.path = path.canonicalize()?;
        Ok(())
    }

    fn pool_start(&mut self) -> Result<()> {
        info!("Starting directory pool {} at {:?}", self.name, self.config.path);

        if let Err(e) = self.build() {
            error!("Failed to build directory pool {}: {}", self.name, e);
            self.active = false;
            return Err(e);
        }

        self.active = true;
        info!("Directory pool {} is active at {:?}", self.name, self.config.path);
        Ok(())
    }

    fn pool_destroy(&mut self) -> Result<()> {
        info!("Deactivating directory pool {}", self.name);
        self.active = false;
        Ok(())
    }

    fn pool_delete(&mut self) -> Result<()> {
        warn!("pool_delete is not supported by directory pool {}", self.name);
        Err(Error::not_supported(&self.name, "pool_delete"))
    }

    fn is_pool_active(&self) -> bool {
        self.active
    }

    fn is_volume_existing(&self, name: &str) -> bool {
        self.volumes.contains_key(name)
    }

    fn create_volume(&mut self, name: &str, format: &str) -> Result<String> {
        self.require_active("create_volume")?;

        if let Some(record) = self.volumes.get(name) {
            debug!("Volume {} already tracked in pool {}", name, self.name);
            return Ok(record.locator.clone());
        }

        validate_volume_name(name)?;

        let record = VolumeRecord::file(self.volume_path(name), format);
        let locator = record.locator.clone();

        info!(
            "Created volume: pool={}, name={}, format={}, path={:?}",
            self.name, name, format, record.path
        );
        self.volumes.insert(name.to_string(), record);

        Ok(locator)
    }

    fn delete_volume(&mut self, name: &str) -> Result<()> {
        self.require_active("delete_volume")?;

        let path = self.tracked(name)?.path.clone();

        if path.is_file() {
            fs::remove_file(&path)?;
            info!("Removed volume file {:?}", path);
        }

        self.volumes.remove(name);
        info!("Deleted volume: pool={}, name={}", self.name, name);

        Ok(())
    }

    fn clone_volume(&mut self, source: &str, dest: &str) -> Result<String> {
        self.require_active("clone_volume")?;

        let (source_path, format) = {
            let record = self.tracked(source)?;
            (record.path.clone(), record.format.clone())
        };
        self.backing_metadata(source, &source_path)?;

        if self.volumes.contains_key(dest) {
            return Err(Error::volume_exists(&self.name, dest));
        }
        validate_volume_name(dest)?;

        let record = VolumeRecord::file(self.volume_path(dest), &format);
        if record.path.exists() {
            return Err(Error::AlreadyExists(format!(
                "File {:?} already exists",
                record.path
            )));
        }

        let copied = fs::copy(&source_path, &record.path)?;
        info!(
            "Cloned volume: pool={}, source={}, dest={}, bytes={}",
            self.name, source, dest, copied
        );

        let locator = record.locator.clone();
        self.volumes.insert(dest.to_string(), record);

        Ok(locator)
    }
}
