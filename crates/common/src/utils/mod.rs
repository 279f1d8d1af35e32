/// 工具函数集合

pub mod min_queue;

pub use min_queue::MinQueue;

use std::collections::HashMap;
use uuid::Uuid;

const DECIMAL_SUFFIXES: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const BINARY_SUFFIXES: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// 生成唯一 ID
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// 格式化字节大小
///
/// 选择使缩放值小于进制基数的最大单位（十进制 1000，二进制 1024）。
/// 字节单位输出整数，其余单位保留一位小数。
pub fn format_size_human_readable(bytes: u64, binary: bool) -> String {
    let (suffixes, base) = if binary {
        (BINARY_SUFFIXES, 1024.0)
    } else {
        (DECIMAL_SUFFIXES, 1000.0)
    };

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= base && unit_index < suffixes.len() - 1 {
        size /= base;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, suffixes[0])
    } else {
        format!("{:.1} {}", size, suffixes[unit_index])
    }
}

/// 解析 `key=value,key=value` 形式的参数串
///
/// 空片段会被跳过，只在第一个 `=` 处切分；没有 `=` 的片段值为空串
pub fn parse_extra_params(params: &str) -> HashMap<String, String> {
    params
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}
