//! # 配置模块
//!
//! ## 设计思路
//!
//! `ImageConfig` 汇总规范化时的两类可调项：
//! - 资源上限：拒绝会耗尽内存的超大位图，尽早在分配像素之前失败
//! - PNG 参数：压缩级别与行滤波
//!
//! 设置文件只暴露高层档位（quality / balanced / speed），由 `png_params` 映射到底层组合。

use std::fmt;
use std::str::FromStr;

use image::codecs::png::{CompressionType, FilterType};

use super::ImageError;

/// 图片规范化配置。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 允许的最大像素数（宽 × 高）。
    pub max_decoded_pixels: u64,
    /// 按 RGBA 每像素 4 字节估算的解码内存上限。
    pub max_decoded_bytes: u64,
    pub png_compression: CompressionType,
    pub png_filter: FilterType,
}

impl Default for ImageConfig {
    fn default() -> Self {
        let (png_compression, png_filter) = ImagePerformanceProfile::Balanced.png_params();
        Self {
            // 约 8K × 5K
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            png_compression,
            png_filter,
        }
    }
}

/// PNG 编码档位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePerformanceProfile {
    /// 体积最小，编码最慢。
    Quality,
    Balanced,
    /// 跳过行滤波，编码最快。
    Speed,
}

impl ImagePerformanceProfile {
    pub const ALL: [Self; 3] = [Self::Quality, Self::Balanced, Self::Speed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// 档位对应的压缩级别与滤波方式。
    pub fn png_params(self) -> (CompressionType, FilterType) {
        match self {
            Self::Quality => (CompressionType::Best, FilterType::Adaptive),
            Self::Balanced => (CompressionType::Default, FilterType::Adaptive),
            Self::Speed => (CompressionType::Fast, FilterType::NoFilter),
        }
    }
}

impl FromStr for ImagePerformanceProfile {
    type Err = ImageError;

    /// 忽略大小写与首尾空白。
    ///
    /// ```rust
    /// use clipboard_reader::image_handler::ImagePerformanceProfile;
    ///
    /// let profile: ImagePerformanceProfile = " Speed ".parse()?;
    /// assert_eq!(profile, ImagePerformanceProfile::Speed);
    /// # Ok::<(), clipboard_reader::image_handler::ImageError>(())
    /// ```
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ImageError::InvalidFormat(format!(
                    "未知图片档位 \"{}\"，应为 quality、balanced 或 speed",
                    name
                ))
            })
    }
}

impl fmt::Display for ImagePerformanceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ImageConfig {
    /// 由压缩级别反推档位，用于启动日志。
    pub fn infer_performance_profile(&self) -> ImagePerformanceProfile {
        match self.png_compression {
            CompressionType::Best => ImagePerformanceProfile::Quality,
            CompressionType::Fast => ImagePerformanceProfile::Speed,
            _ => ImagePerformanceProfile::Balanced,
        }
    }

    pub fn apply_performance_profile(&mut self, profile: ImagePerformanceProfile) {
        (self.png_compression, self.png_filter) = profile.png_params();
    }

    /// 在分配像素缓冲之前检查尺寸是否超出上限。
    pub fn check_resource_limits(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "{}x{} 共 {} 像素，超过上限 {}",
                width, height, pixels, self.max_decoded_pixels
            )));
        }

        // u32 × u32 × 4 不会溢出 u64
        let rgba_bytes = pixels * 4;
        if rgba_bytes > self.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "RGBA 缓冲需要 {} 字节，超过上限 {} 字节",
                rgba_bytes, self.max_decoded_bytes
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageConfig, ImagePerformanceProfile};

    #[test]
    fn profile_names_parse_case_insensitively() {
        assert_eq!(
            "QUALITY".parse::<ImagePerformanceProfile>().ok(),
            Some(ImagePerformanceProfile::Quality)
        );
        assert!("turbo".parse::<ImagePerformanceProfile>().is_err());
        assert!("".parse::<ImagePerformanceProfile>().is_err());
    }

    #[test]
    fn every_profile_survives_apply_then_infer() {
        for profile in ImagePerformanceProfile::ALL {
            let mut config = ImageConfig::default();
            config.apply_performance_profile(profile);
            assert_eq!(config.infer_performance_profile(), profile);
            assert_eq!(profile.to_string(), profile.as_str());
        }
    }

    #[test]
    fn pixel_and_byte_limits_are_checked_separately() {
        let defaults = ImageConfig::default();
        assert!(defaults.check_resource_limits(10, 10).is_ok());

        let few_pixels = ImageConfig {
            max_decoded_pixels: 99,
            ..ImageConfig::default()
        };
        assert!(few_pixels.check_resource_limits(10, 10).is_err());

        let few_bytes = ImageConfig {
            max_decoded_bytes: 399,
            ..ImageConfig::default()
        };
        assert!(few_bytes.check_resource_limits(10, 10).is_err());
        assert!(few_bytes.check_resource_limits(9, 11).is_ok());
    }

    #[test]
    fn defaults_use_balanced_encoding() {
        let config = ImageConfig::default();
        assert_eq!(
            config.infer_performance_profile(),
            ImagePerformanceProfile::Balanced
        );
        assert_eq!(config.max_decoded_bytes, 160 * 1024 * 1024);
    }
}
