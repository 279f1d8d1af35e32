/// Easy VM Cloud - 存储公共库
///
/// 提供存储池共享的类型、错误处理、工具函数等

pub mod bg_errors;
pub mod device;
pub mod errors;
pub mod logging;
pub mod models;
pub mod utils;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{PoolKind, PoolState};
