//! 剪贴板读取模块
//!
//! # 设计思路
//!
//! 统一管理剪贴板读取的核心能力：
//! - **后端抽象**：`ClipboardBackend` 描述系统剪贴板协作者（打开、关闭、格式查询、锁定数据、读取位图），
//!   Windows 使用 Win32 原生接口，其他平台回退到 `arboard`，测试可注入内存实现
//! - **RAII Guard**：`ClipboardGuard` 构造时打开剪贴板，`Drop` 时关闭，任何退出路径都不会泄漏
//! - **快照服务**：`ClipboardReader` 按固定优先级挑选最佳表示，返回 `ClipboardSnapshot`
//!
//! # 实现思路
//!
//! - 锁定的内存由后端的 `Memory` 关联类型表示，`Drop` 时解锁，读取逻辑中不出现显式解锁。
//! - 所有失败都以 `ClipboardSnapshot::Failure` 值返回，不会让进程退出。
//! - 子模块按职责拆分：状态机归 `reader`，文本转换归 `text`，平台实现归 `win32` / `fallback`。

mod error;
mod guard;
mod reader;
mod snapshot;
pub mod text;

#[cfg(target_os = "windows")]
mod win32;
#[cfg(not(target_os = "windows"))]
mod fallback;

use std::ops::Deref;

use serde::Deserialize;

use crate::image_handler::DeviceBitmap;

pub use error::ClipboardError;
pub use guard::ClipboardGuard;
pub use reader::ClipboardReader;
pub use snapshot::ClipboardSnapshot;

#[cfg(target_os = "windows")]
pub use win32::Win32Clipboard as SystemClipboard;
#[cfg(not(target_os = "windows"))]
pub use fallback::ArboardClipboard as SystemClipboard;

/// 读取流程关心的四种标准剪贴板格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardFormat {
    /// 已实体化的位图对象（`CF_BITMAP`）。
    Bitmap,
    /// 设备无关位图数据块（`CF_DIB`）。
    Dib,
    /// UTF-16 宽字符文本（`CF_UNICODETEXT`）。
    UnicodeText,
    /// 旧式单字节文本（`CF_TEXT`）。
    Text,
}

impl ClipboardFormat {
    /// 面向错误消息的类别名称。
    pub fn kind(self) -> &'static str {
        match self {
            Self::Bitmap | Self::Dib => "image",
            Self::UnicodeText | Self::Text => "text",
        }
    }
}

/// 调用方的读取偏好。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFormat {
    /// 图片优先，其次文本。
    #[default]
    Auto,
    /// 只读取文本。
    Text,
    /// 只读取图片。
    Image,
}

impl ReadFormat {
    pub fn wants_image(self) -> bool {
        matches!(self, Self::Auto | Self::Image)
    }

    pub fn wants_text(self) -> bool {
        matches!(self, Self::Auto | Self::Text)
    }
}

/// 系统剪贴板协作者。
///
/// 只有 `open` / `close` 需要可变借用；其余操作都在 `ClipboardGuard` 持有期间通过共享借用完成。
pub trait ClipboardBackend {
    /// 已锁定的数据块，`Drop` 时解锁。
    type Memory<'a>: Deref<Target = [u8]>
    where
        Self: 'a;

    /// 取得剪贴板独占访问。
    fn open(&mut self) -> Result<(), ClipboardError>;

    /// 释放独占访问；未打开时调用应为空操作。
    fn close(&mut self);

    fn is_format_available(&self, format: ClipboardFormat) -> bool;

    /// 取得格式对应的数据句柄并锁定。
    ///
    /// 取不到句柄返回 `FormatUnavailable`，锁定失败返回 `Lock`。
    fn lock_data(&self, format: ClipboardFormat) -> Result<Self::Memory<'_>, ClipboardError>;

    /// 读取 `CF_BITMAP` 位图对象的像素。
    fn realized_bitmap(&self) -> Result<DeviceBitmap, ClipboardError>;
}

#[cfg(test)]
mod tests {
    use super::ReadFormat;

    #[test]
    fn read_format_parses_lowercase_names() {
        let parsed: ReadFormat = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, ReadFormat::Image);
        assert!(serde_json::from_str::<ReadFormat>("\"png\"").is_err());
    }

    #[test]
    fn auto_wants_everything() {
        assert!(ReadFormat::Auto.wants_image() && ReadFormat::Auto.wants_text());
        assert!(!ReadFormat::Text.wants_image());
        assert!(!ReadFormat::Image.wants_text());
    }
}
