/// 设备热插拔错误
///
/// 设备管理层使用的错误族。错误携带设备、原因以及所属设备集合，
/// 渲染时会附带设备集合的简要列表和总线拓扑。

use std::fmt;
use std::sync::Arc;

/// 可描述的设备
pub trait DeviceDescribe: Send + Sync {
    /// 设备的完整描述
    fn str_long(&self) -> String;
}

/// 虚拟机设备集合
pub trait DeviceCollection: Send + Sync {
    /// 设备简要列表
    fn str_short(&self) -> String;

    /// 总线拓扑详情
    fn str_bus_long(&self) -> String;
}

/// 失败的设备操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIssue {
    Insert,
    Remove,
    Hotplug,
    Unplug,
}

impl DeviceIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Hotplug => "hotplug",
            Self::Unplug => "unplug",
        }
    }
}

impl fmt::Display for DeviceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 设备操作错误
#[derive(Clone)]
pub struct DeviceError {
    pub issue: DeviceIssue,
    pub device: Arc<dyn DeviceDescribe>,
    pub reason: String,
    pub collection: Arc<dyn DeviceCollection>,
    /// 热插拔校验输出（仅 hotplug/unplug）
    pub verify_output: Option<String>,
}

impl DeviceError {
    fn new(
        issue: DeviceIssue,
        device: Arc<dyn DeviceDescribe>,
        reason: impl Into<String>,
        collection: Arc<dyn DeviceCollection>,
    ) -> Self {
        Self {
            issue,
            device,
            reason: reason.into(),
            collection,
            verify_output: None,
        }
    }

    pub fn insert(
        device: Arc<dyn DeviceDescribe>,
        reason: impl Into<String>,
        collection: Arc<dyn DeviceCollection>,
    ) -> Self {
        Self::new(DeviceIssue::Insert, device, reason, collection)
    }

    pub fn remove(
        device: Arc<dyn DeviceDescribe>,
        reason: impl Into<String>,
        collection: Arc<dyn DeviceCollection>,
    ) -> Self {
        Self::new(DeviceIssue::Remove, device, reason, collection)
    }

    pub fn hotplug(
        device: Arc<dyn DeviceDescribe>,
        reason: impl Into<String>,
        collection: Arc<dyn DeviceCollection>,
        verify_output: Option<String>,
    ) -> Self {
        Self {
            verify_output,
            ..Self::new(DeviceIssue::Hotplug, device, reason, collection)
        }
    }

    pub fn unplug(
        device: Arc<dyn DeviceDescribe>,
        reason: impl Into<String>,
        collection: Arc<dyn DeviceCollection>,
    ) -> Self {
        Self::new(DeviceIssue::Unplug, device, reason, collection)
    }

    /// hotplug 与 unplug 同属热插拔类错误
    pub fn is_hotplug_family(&self) -> bool {
        matches!(self.issue, DeviceIssue::Hotplug | DeviceIssue::Unplug)
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to {} device:\n{}\nBecause:\n{}\nList of VM devices:\n{}\n{}",
            self.issue,
            self.device.str_long(),
            self.reason,
            self.collection.str_short(),
            self.collection.str_bus_long()
        )
    }
}

impl std::error::Error for DeviceError {}

impl fmt::Debug for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceError")
            .field("issue", &self.issue)
            .field("device", &self.device.str_long())
            .field("reason", &self.reason)
            .field("verify_output", &self.verify_output)
            .finish()
    }
}
