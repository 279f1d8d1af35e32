use thiserror::Error;

/// 统一错误类型
///
/// 领域错误携带存储池/存储卷标识，底层文件系统错误通过 `Io` 原样透传
#[derive(Error, Debug)]
pub enum Error {
    /// 构造存储池时配置校验失败
    #[error("存储池配置错误: {0}")]
    PoolConfig(String),

    #[error("存储池 {pool} 未激活, 无法调用 {operation}")]
    PoolInactive { pool: String, operation: String },

    #[error("存储池 {pool} 中不存在存储卷 {volume}")]
    VolumeNotFound { pool: String, volume: String },

    #[error("存储池 {pool} 中已存在存储卷 {volume}")]
    VolumeExists { pool: String, volume: String },

    #[error("存储池 {pool} 不支持操作 {operation}")]
    NotSupported { pool: String, operation: String },

    /// 环境配置加载失败
    #[error("配置错误: {0}")]
    Config(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源已存在: {0}")]
    AlreadyExists(String),

    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn pool_inactive(pool: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::PoolInactive {
            pool: pool.into(),
            operation: operation.into(),
        }
    }

    pub fn volume_not_found(pool: impl Into<String>, volume: impl Into<String>) -> Self {
        Self::VolumeNotFound {
            pool: pool.into(),
            volume: volume.into(),
        }
    }

    pub fn volume_exists(pool: impl Into<String>, volume: impl Into<String>) -> Self {
        Self::VolumeExists {
            pool: pool.into(),
            volume: volume.into(),
        }
    }

    pub fn not_supported(pool: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::NotSupported {
            pool: pool.into(),
            operation: operation.into(),
        }
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_carry_identity() {
        let err = Error::pool_inactive("p1", "delete_volume");
        let msg = err.to_string();
        assert!(msg.contains("p1"));
        assert!(msg.contains("delete_volume"));

        let err = Error::volume_not_found("p1", "a.qcow2");
        let msg = err.to_string();
        assert!(msg.contains("p1"));
        assert!(msg.contains("a.qcow2"));
    }

    #[test]
    fn test_io_error_passthrough() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err: Error = io.into();
        match err {
            Error::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
