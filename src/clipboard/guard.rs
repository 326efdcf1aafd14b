//! # ClipboardGuard — RAII 剪贴板独占访问
//!
//! ## 设计思路
//!
//! 剪贴板在系统范围内同一时刻只能被一个窗口打开。`ClipboardGuard` 构造时打开，
//! `Drop` 时关闭，保证提前返回、错误分支乃至 panic 展开时都不会把剪贴板锁留在身上。
//!
//! 守卫通过 `Deref` 只暴露后端的只读能力（格式查询、锁定数据），
//! 关闭动作只能由 `Drop` 触发，逻辑代码里不会出现散落的 `close()` 调用。

use std::ops::Deref;

use super::{ClipboardBackend, ClipboardError};

/// 一次读取操作内的剪贴板独占句柄。
///
/// # 示例
/// ```rust,ignore
/// let guard = ClipboardGuard::acquire(&mut backend)?;
/// let available = guard.is_format_available(ClipboardFormat::Dib);
/// // guard 离开作用域时自动关闭剪贴板
/// ```
pub struct ClipboardGuard<'a, B: ClipboardBackend> {
    backend: &'a mut B,
}

impl<'a, B: ClipboardBackend> ClipboardGuard<'a, B> {
    /// 打开剪贴板；失败时不会产生守卫，也就不会有多余的关闭调用。
    pub fn acquire(backend: &'a mut B) -> Result<Self, ClipboardError> {
        backend.open()?;
        log::debug!("🔓 已打开剪贴板");
        Ok(Self { backend })
    }
}

impl<B: ClipboardBackend> Deref for ClipboardGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: ClipboardBackend> Drop for ClipboardGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.close();
        log::debug!("🔒 已关闭剪贴板");
    }
}
