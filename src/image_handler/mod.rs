//! # 图片规范化模块（image_handler）
//!
//! ## 设计思路
//!
//! 剪贴板里的图片有两种形态：自描述的 `CF_DIB` 内存块，以及已实体化的 `CF_BITMAP`
//! 位图对象。该模块把两者统一转换为“规范图片”（PNG 字节 + 宽高）。
//!
//! - `dib`：DIB 头解析、调色板/掩码偏移计算、像素解码
//! - `pipeline`：资源上限校验、PNG 编码、panic 兜底
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! clipboard::ClipboardReader
//!    ├─ from_device_independent_bitmap（CF_DIB，优先）
//!    │     └─ dib.rs 解析 → RealizedBitmap
//!    └─ from_bitmap_object（CF_BITMAP，兜底）
//!          └─ DeviceBitmap → RealizedBitmap
//!    ↓
//! pipeline.rs PNG 编码 → CanonicalImage
//! ```

mod config;
pub mod dib;
mod error;
mod pipeline;
mod source;

pub use config::{ImageConfig, ImagePerformanceProfile};
pub use error::ImageError;
pub use source::{CanonicalImage, DeviceBitmap, RealizedBitmap};

/// 图片规范化器。
///
/// 只持有一份不可变配置，单次读取内不会发生配置漂移。
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    pub(crate) config: ImageConfig,
}

impl ImageNormalizer {
    /// # 示例
    /// ```rust
    /// use clipboard_reader::image_handler::{ImageConfig, ImageNormalizer};
    ///
    /// let normalizer = ImageNormalizer::new(ImageConfig::default());
    /// assert!(normalizer.from_device_independent_bitmap(&[]).is_err());
    /// ```
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }
}
