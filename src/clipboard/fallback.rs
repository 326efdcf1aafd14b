//! # 非 Windows 回退后端 — 沿用 arboard
//!
//! `arboard` 没有“格式查询 + 句柄”的概念，因此在 `open` 时一次性取出图片与文本，
//! 再伪装成 Win32 的两种标准格式：
//! - 图片 → 32 位自上而下 `CF_DIB`（BGRA），与 Windows 走同一条 DIB 解析路径
//! - 文本 → `\0` 结尾的 UTF-16LE（`CF_UNICODETEXT`）
//!
//! `close` 时丢弃会话与缓存，不跨读取保留任何剪贴板内容。

use bytes::BufMut;

use super::text::encode_wide;
use super::{ClipboardBackend, ClipboardError, ClipboardFormat};
use crate::image_handler::dib::BI_RGB;
use crate::image_handler::DeviceBitmap;

/// 基于 `arboard` 的剪贴板后端。
#[derive(Default)]
pub struct ArboardClipboard {
    session: Option<arboard::Clipboard>,
    dib: Option<Vec<u8>>,
    wide_text: Option<Vec<u8>>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardBackend for ArboardClipboard {
    type Memory<'a> = &'a [u8];

    fn open(&mut self) -> Result<(), ClipboardError> {
        let mut session = arboard::Clipboard::new().map_err(|e| {
            log::warn!("无法访问剪贴板：{}", e);
            ClipboardError::Acquisition
        })?;

        self.dib = match session.get_image() {
            Ok(image) => build_top_down_dib(image.width, image.height, &image.bytes),
            Err(e) => {
                log::debug!("剪贴板无图片：{}", e);
                None
            }
        };
        self.wide_text = match session.get_text() {
            Ok(text) => Some(encode_wide(&text)),
            Err(e) => {
                log::debug!("剪贴板无文本：{}", e);
                None
            }
        };
        self.session = Some(session);
        Ok(())
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            log::debug!("释放 arboard 会话");
        }
        self.dib = None;
        self.wide_text = None;
    }

    fn is_format_available(&self, format: ClipboardFormat) -> bool {
        match format {
            ClipboardFormat::Dib => self.dib.is_some(),
            ClipboardFormat::UnicodeText => self.wide_text.is_some(),
            ClipboardFormat::Bitmap | ClipboardFormat::Text => false,
        }
    }

    fn lock_data(&self, format: ClipboardFormat) -> Result<&[u8], ClipboardError> {
        let data = match format {
            ClipboardFormat::Dib => self.dib.as_deref(),
            ClipboardFormat::UnicodeText => self.wide_text.as_deref(),
            ClipboardFormat::Bitmap | ClipboardFormat::Text => None,
        };
        data.ok_or(ClipboardError::FormatUnavailable(format))
    }

    fn realized_bitmap(&self) -> Result<DeviceBitmap, ClipboardError> {
        Err(ClipboardError::FormatUnavailable(ClipboardFormat::Bitmap))
    }
}

/// RGBA → 40 字节头 + BGRA 像素（负高度表示自上而下）。
fn build_top_down_dib(width: usize, height: usize, rgba: &[u8]) -> Option<Vec<u8>> {
    let width_i32 = i32::try_from(width).ok()?;
    let height_i32 = i32::try_from(height).ok()?;
    let pixel_bytes = width.checked_mul(height)?.checked_mul(4)?;
    if rgba.len() != pixel_bytes {
        log::warn!(
            "像素长度不匹配: 期望 {} 实际 {}",
            pixel_bytes,
            rgba.len()
        );
        return None;
    }

    let mut dib = Vec::with_capacity(40 + pixel_bytes);
    dib.put_u32_le(40);
    dib.put_i32_le(width_i32);
    dib.put_i32_le(-height_i32);
    dib.put_u16_le(1);
    dib.put_u16_le(32);
    dib.put_u32_le(BI_RGB);
    dib.put_u32_le(u32::try_from(pixel_bytes).ok()?);
    dib.put_i32_le(0);
    dib.put_i32_le(0);
    dib.put_u32_le(0);
    dib.put_u32_le(0);

    for px in rgba.chunks_exact(4) {
        dib.put_slice(&[px[2], px[1], px[0], px[3]]);
    }

    Some(dib)
}
