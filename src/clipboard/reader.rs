//! # 剪贴板快照服务
//!
//! ## 状态流转
//!
//! ```text
//! Idle ─► Acquiring ─┬─► AcquireFailed ──► Failure("Failed to open clipboard")
//!                    └─► Inspecting
//!                          ├─ 图片格式？ CF_DIB → CF_BITMAP，首个非空 PNG 胜出
//!                          │     └─ 全部失败则继续往下
//!                          ├─ 文本格式？ CF_UNICODETEXT → CF_TEXT
//!                          ├─ 仅宣称图片但无可用载荷 → Failure
//!                          └─ 都没有 → Empty
//! ```
//!
//! 尝试顺序固定且串行，顺序本身决定了歧义剪贴板状态下的可观察行为。
//! 剪贴板在 `read_with` 返回前由 `ClipboardGuard` 关闭，恰好一次。

use crate::image_handler::{CanonicalImage, ImageNormalizer};

use super::text;
use super::{
    ClipboardBackend, ClipboardError, ClipboardFormat, ClipboardGuard, ClipboardSnapshot,
    ReadFormat,
};

/// 剪贴板读取服务。
pub struct ClipboardReader<B: ClipboardBackend> {
    backend: B,
    normalizer: ImageNormalizer,
}

impl<B: ClipboardBackend> ClipboardReader<B> {
    pub fn new(backend: B, normalizer: ImageNormalizer) -> Self {
        Self {
            backend,
            normalizer,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 按默认优先级（图片优先于文本）读取剪贴板。
    pub fn read(&mut self) -> ClipboardSnapshot {
        self.read_with(ReadFormat::Auto)
    }

    /// 按指定偏好读取剪贴板。
    pub fn read_with(&mut self, format: ReadFormat) -> ClipboardSnapshot {
        let guard = match ClipboardGuard::acquire(&mut self.backend) {
            Ok(guard) => guard,
            Err(err) => {
                log::warn!("⚠️ 打开剪贴板失败：{}", err);
                return ClipboardSnapshot::failure(err);
            }
        };

        let snapshot = inspect(&*guard, &self.normalizer, format);
        log::debug!("📋 读取完成 - format={:?} result={}", format, snapshot.kind());
        snapshot
    }
}

fn inspect<B: ClipboardBackend>(
    backend: &B,
    normalizer: &ImageNormalizer,
    format: ReadFormat,
) -> ClipboardSnapshot {
    let has_image = format.wants_image()
        && (backend.is_format_available(ClipboardFormat::Bitmap)
            || backend.is_format_available(ClipboardFormat::Dib));
    let has_text = format.wants_text()
        && (backend.is_format_available(ClipboardFormat::UnicodeText)
            || backend.is_format_available(ClipboardFormat::Text));

    if has_image {
        match read_image(backend, normalizer) {
            Ok(image) => return ClipboardSnapshot::from(image),
            Err(err) => log::warn!("⚠️ 图片转换失败，尝试文本：{}", err),
        }
    }

    if has_text {
        return match read_text(backend) {
            Ok(content) => ClipboardSnapshot::text(content),
            Err(err) => {
                log::warn!("❌ 文本读取失败：{}", err);
                ClipboardSnapshot::failure(err)
            }
        };
    }

    if has_image {
        return ClipboardSnapshot::failure(ClipboardError::Conversion);
    }

    ClipboardSnapshot::Empty
}

/// 依次尝试 DIB 与位图对象两条路径。
fn read_image<B: ClipboardBackend>(
    backend: &B,
    normalizer: &ImageNormalizer,
) -> Result<CanonicalImage, ClipboardError> {
    match backend.lock_data(ClipboardFormat::Dib) {
        Ok(block) => match normalizer.from_device_independent_bitmap(&block) {
            Ok(image) if !image.is_empty() => return Ok(image),
            Ok(_) => log::debug!("CF_DIB 转换结果为空"),
            Err(err) => log::debug!("CF_DIB 转换失败：{}", err),
        },
        Err(err) => log::debug!("CF_DIB 不可用：{}", err),
    }

    match backend.realized_bitmap() {
        Ok(bitmap) => match normalizer.from_bitmap_object(bitmap) {
            Ok(image) if !image.is_empty() => return Ok(image),
            Ok(_) => log::debug!("CF_BITMAP 转换结果为空"),
            Err(err) => log::debug!("CF_BITMAP 转换失败：{}", err),
        },
        Err(err) => log::debug!("CF_BITMAP 不可用：{}", err),
    }

    Err(ClipboardError::Conversion)
}

/// 优先宽字符文本，取不到句柄时退回旧式文本。
fn read_text<B: ClipboardBackend>(backend: &B) -> Result<String, ClipboardError> {
    match backend.lock_data(ClipboardFormat::UnicodeText) {
        Ok(memory) => return text::decode_wide(&memory),
        Err(ClipboardError::FormatUnavailable(_)) => {}
        Err(err) => return Err(err),
    }

    match backend.lock_data(ClipboardFormat::Text) {
        Ok(memory) => Ok(text::decode_legacy(&memory)),
        Err(ClipboardError::FormatUnavailable(_)) => Err(ClipboardError::NoTextData),
        Err(err) => Err(err),
    }
}
