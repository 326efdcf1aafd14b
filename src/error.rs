//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 剪贴板读取本身从不返回 `Err`（失败以 `ClipboardSnapshot::Failure` 值表达），
//! `AppError` 只覆盖读取之外的外围环节：标准输入输出、设置文件、响应序列化。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `io::Error`、`serde_json::Error` 提供 `From` 转换，调用侧直接 `?`。

use std::any::Any;
use std::panic::{self, PanicHookInfo};

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 标准输入输出错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置文件读取或解析失败
    #[error("设置错误: {0}")]
    Settings(String),

    /// 响应序列化失败
    #[error("协议错误: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// 从 panic 负载中提取可读消息。
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "未知异常".to_string())
}

/// panic 钩子输出的单行描述：消息 + 源码位置。
pub(crate) fn describe_panic(info: &PanicHookInfo<'_>) -> String {
    let message = panic_message(info.payload());
    match info.location() {
        Some(location) => format!("{} ({}:{})", message, location.file(), location.line()),
        None => message,
    }
}

/// 替换默认 panic 钩子，panic 只经由 `log` 输出。
///
/// 默认钩子会直接向 stderr 打印 `thread ... panicked`，即使 panic 随后被 `catch_unwind` 捕获。
/// 替换后输出受 `RUST_LOG` 控制，`RUST_LOG=off` 时完全静默。
pub fn route_panics_to_log() {
    panic::set_hook(Box::new(|info| {
        log::error!("💥 发生 panic：{}", describe_panic(info));
    }));
}
