//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“输入形态”和“流水线中间结果”解耦：
//! - `RealizedBitmap` 表示已实体化的位图对象（RGBA 像素）
//! - `DeviceBitmap` 表示从系统位图对象读出的 32 位 BGRX 像素
//! - `CanonicalImage` 表示规范化后的 PNG 字节

use image::RgbaImage;

/// 已实体化的位图对象。
///
/// DIB 解析与系统位图读取最终都汇聚到这里，再统一编码为 PNG。
#[derive(Debug, Clone)]
pub struct RealizedBitmap {
    pub(crate) pixels: RgbaImage,
}

impl RealizedBitmap {
    /// 由 RGBA 像素构建，长度不匹配时返回 `None`。
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(|pixels| Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// 系统位图对象读出的原始像素。
///
/// 行序自上而下，每像素 4 字节 `B G R X`，行无额外填充。
#[derive(Debug, Clone)]
pub struct DeviceBitmap {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

/// 规范化输出：PNG 字节与像素尺寸。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CanonicalImage {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
