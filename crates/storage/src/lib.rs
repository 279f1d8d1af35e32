/// Easy VM Cloud - 存储池管理
///
/// 提供存储池与存储卷的生命周期管理。目前支持目录后端，
/// 网络/对象存储后端可通过实现 `StoragePool` 接入

pub mod config;
pub mod directory;
pub mod driver;
pub mod manager;
pub mod volume;

pub use config::Config;
pub use directory::{DirectoryPool, DirectoryPoolConfig};
pub use driver::{PoolSpec, StoragePool};
pub use manager::{create_pool, StorageManager};
pub use volume::{AttachDescriptor, PoolInfo, PoolStat, SizeValue, VolumeInfo, VolumeRecord};
