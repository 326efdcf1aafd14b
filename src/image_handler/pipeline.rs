//! # 规范化流水线模块
//!
//! ## 设计思路
//!
//! 两种输入形态在这里汇合为同一个输出：
//!
//! ```text
//! CF_DIB 数据块 ──解析头──► 资源上限校验 ──解码像素──┐
//!                                                   ├─► RealizedBitmap ──PNG 编码──► CanonicalImage
//! CF_BITMAP 像素 ──BGRX→RGBA──────────────────────┘
//! ```
//!
//! 调用方只会拿到 `Result`，不会观察到 panic：入口处用 `catch_unwind` 兜底。
//!
//! ## 实现思路
//!
//! 1. 先读头信息得到宽高，按像素上限快速拒绝，再分配像素内存
//! 2. 解码为 RGBA
//! 3. 用 `PngEncoder` 写入内存缓冲，产出独占的字节序列

use std::panic::{self, AssertUnwindSafe};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::panic_message;

use super::dib::DibHeader;
use super::source::{CanonicalImage, DeviceBitmap, RealizedBitmap};
use super::{ImageError, ImageNormalizer};

impl ImageNormalizer {
    /// 将 `CF_DIB` 数据块规范化为 PNG。
    pub fn from_device_independent_bitmap(&self, block: &[u8]) -> Result<CanonicalImage, ImageError> {
        catch_graphics_panic("DIB", || {
            let header = DibHeader::parse(block)?;
            self.config.check_resource_limits(header.width, header.height)?;

            log::debug!(
                "🧩 DIB 头：{}x{} {}bpp compression={} palette={}",
                header.width,
                header.height,
                header.bit_count,
                header.compression,
                header.palette_entries
            );

            let bitmap = header.decode(block, &self.config)?;
            self.encode_png(&bitmap)
        })
    }

    /// 将系统位图对象读出的像素规范化为 PNG。
    pub fn from_bitmap_object(&self, bitmap: DeviceBitmap) -> Result<CanonicalImage, ImageError> {
        catch_graphics_panic("BITMAP", || {
            if bitmap.width == 0 || bitmap.height == 0 || bitmap.bgra.is_empty() {
                return Err(ImageError::Empty("位图对象为空".to_string()));
            }
            self.config.check_resource_limits(bitmap.width, bitmap.height)?;

            let realized = realize_device_bitmap(bitmap)?;
            self.encode_png(&realized)
        })
    }

    /// 将已实体化位图编码为 PNG。
    pub fn encode_png(&self, bitmap: &RealizedBitmap) -> Result<CanonicalImage, ImageError> {
        let (width, height) = (bitmap.width(), bitmap.height());
        if width == 0 || height == 0 {
            return Err(ImageError::Empty("位图尺寸为 0".to_string()));
        }

        let mut bytes = Vec::new();
        PngEncoder::new_with_quality(&mut bytes, self.config.png_compression, self.config.png_filter)
            .write_image(bitmap.pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;

        if bytes.is_empty() {
            return Err(ImageError::Encode("PNG 编码结果为空".to_string()));
        }

        log::info!("✅ 图片规范化成功 - {}x{} PNG {} 字节", width, height, bytes.len());

        Ok(CanonicalImage {
            bytes,
            width,
            height,
        })
    }
}

/// 系统位图像素为 `B G R X`，保留字节通常为 0，统一按不透明处理。
fn realize_device_bitmap(bitmap: DeviceBitmap) -> Result<RealizedBitmap, ImageError> {
    let expected_len = (bitmap.width as usize)
        .checked_mul(bitmap.height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(|| ImageError::ResourceLimit("位图尺寸导致内存溢出风险".to_string()))?;

    if bitmap.bgra.len() != expected_len {
        return Err(ImageError::Decode(format!(
            "位图像素长度不匹配：期望 {} 实际 {}",
            expected_len,
            bitmap.bgra.len()
        )));
    }

    let mut rgba = bitmap.bgra;
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
        px[3] = 0xFF;
    }

    RealizedBitmap::from_rgba(bitmap.width, bitmap.height, rgba)
        .ok_or_else(|| ImageError::Graphics("无法从像素实体化位图".to_string()))
}

/// 图形子系统边界：任何 panic 都转为 `ImageError::Graphics`。
fn catch_graphics_panic<F>(stage: &str, convert: F) -> Result<CanonicalImage, ImageError>
where
    F: FnOnce() -> Result<CanonicalImage, ImageError>,
{
    match panic::catch_unwind(AssertUnwindSafe(convert)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("💥 {} 转换过程中发生异常：{}", stage, message);
            Err(ImageError::Graphics(format!("{} 转换异常：{}", stage, message)))
        }
    }
}
