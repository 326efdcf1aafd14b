//! 运行时设置
//!
//! 设置文件是可选的 JSON，路径由环境变量 `CLIPBOARD_READER_CONFIG` 指定：
//!
//! ```json
//! { "image_profile": "speed", "max_decoded_pixels": 20000000 }
//! ```
//!
//! 文件不存在时使用默认值；解析失败时记录警告并回退默认值，进程照常启动。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::image_handler::{ImageConfig, ImagePerformanceProfile};

/// 设置文件路径所在的环境变量。
pub const CONFIG_ENV: &str = "CLIPBOARD_READER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// 图片性能档位：quality / balanced / speed。
    pub image_profile: Option<String>,
    pub max_decoded_pixels: Option<u64>,
    pub max_decoded_bytes: Option<u64>,
}

impl ReaderSettings {
    pub fn load_from_env() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_path(Path::new(&path)),
            None => Self::default(),
        }
    }

    pub fn load_from_path(path: &Path) -> Self {
        match Self::read_from_path(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("⚠️ 读取设置失败，使用默认设置: {}", err);
                Self::default()
            }
        }
    }

    fn read_from_path(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::debug!("设置文件不存在: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))
    }

    /// 合成图片规范化配置；未知档位记录警告并保持默认档位。
    pub fn image_config(&self) -> ImageConfig {
        let mut config = ImageConfig::default();

        if let Some(profile) = &self.image_profile {
            match profile.parse::<ImagePerformanceProfile>() {
                Ok(profile) => config.apply_performance_profile(profile),
                Err(err) => log::warn!("⚠️ {}，使用默认档位", err),
            }
        }
        if let Some(pixels) = self.max_decoded_pixels {
            config.max_decoded_pixels = pixels;
        }
        if let Some(bytes) = self.max_decoded_bytes {
            config.max_decoded_bytes = bytes;
        }

        config
    }
}
