/// 存储池抽象层
///
/// 定义统一的存储池接口，各存储后端（目录、未来的网络/对象存储）实现该 trait

use common::{PoolKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::volume::{PoolInfo, PoolStat, VolumeInfo};

/// 存储池声明
///
/// 注册存储池时使用：名称、后端类型和后端参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolSpec {
    pub name: String,
    pub kind: PoolKind,
    pub config: HashMap<String, String>,
}

/// 存储池 Trait
///
/// 除构造与配置校验外不提供任何默认行为。后端无法支持的操作必须返回
/// `Error::NotSupported`，不能静默成功。
pub trait StoragePool: Send + Sync {
    /// 存储池名称
    fn name(&self) -> &str;

    /// 构造时生成的唯一 ID
    fn id(&self) -> Uuid;

    /// 后端类型
    fn kind(&self) -> PoolKind;

    fn source_list(&self) -> &[String];

    fn target_list(&self) -> &[String];

    /// 存储池详情，需要已激活
    fn pool_info(&self) -> Result<PoolInfo>;

    /// 容量统计，需要已激活
    fn pool_stat(&self, human: bool) -> Result<PoolStat>;

    /// 获取存储卷信息
    fn get_vol_info(&self, name: &str, verbose: bool, human: bool) -> Result<VolumeInfo>;

    /// 列出所有存储卷
    fn pool_list_vols(&self, verbose: bool, human: bool) -> Result<BTreeMap<String, VolumeInfo>>;

    /// 根据配置准备后端资源，由 pool_start 调用
    fn build(&mut self) -> Result<()>;

    /// 激活存储池，仅在 build 成功后标记为激活
    fn pool_start(&mut self) -> Result<()>;

    /// 停用存储池，不触碰后端资源
    fn pool_destroy(&mut self) -> Result<()>;

    /// 永久删除后端资源和配置，不可恢复
    fn pool_delete(&mut self) -> Result<()>;

    fn is_pool_active(&self) -> bool;

    /// 是否跟踪了该存储卷，不会修改状态
    fn is_volume_existing(&self, name: &str) -> bool;

    /// 创建存储卷，返回卷定位符
    fn create_volume(&mut self, name: &str, format: &str) -> Result<String>;

    /// 删除存储卷
    fn delete_volume(&mut self, name: &str) -> Result<()>;

    /// 克隆存储卷，返回目标卷定位符
    fn clone_volume(&mut self, source: &str, dest: &str) -> Result<String>;
}
