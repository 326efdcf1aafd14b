//! # 剪贴板快照
//!
//! 每次读取都新建一个 `ClipboardSnapshot`，构造后不再修改，所有权交给调用方。
//! 四个分支互斥，替代“错误标志 + 消息字段”式的结构体。

use std::fmt::Display;

use crate::image_handler::CanonicalImage;

/// 单次读取的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardSnapshot {
    /// 剪贴板中没有文本或图片。
    Empty,
    /// UTF-8 文本。
    Text { content: String },
    /// 规范化后的 PNG 图片。
    Image {
        bytes: Vec<u8>,
        mime_type: &'static str,
        width: u32,
        height: u32,
        size: usize,
    },
    /// 读取失败，消息会原样返回给调用方。
    Failure { message: String },
}

impl ClipboardSnapshot {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self::Failure {
            message: error.to_string(),
        }
    }

    /// 结果类型标识，用于日志。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Failure { .. } => "error",
        }
    }
}

impl From<CanonicalImage> for ClipboardSnapshot {
    fn from(image: CanonicalImage) -> Self {
        let size = image.bytes.len();
        Self::Image {
            bytes: image.bytes,
            mime_type: CanonicalImage::MIME_TYPE,
            width: image.width,
            height: image.height,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClipboardSnapshot;
    use crate::clipboard::ClipboardError;
    use crate::image_handler::CanonicalImage;

    #[test]
    fn image_snapshot_records_png_mime_and_size() {
        let snapshot = ClipboardSnapshot::from(CanonicalImage {
            bytes: vec![1, 2, 3],
            width: 4,
            height: 5,
        });
        assert_eq!(
            snapshot,
            ClipboardSnapshot::Image {
                bytes: vec![1, 2, 3],
                mime_type: "image/png",
                width: 4,
                height: 5,
                size: 3,
            }
        );
    }

    #[test]
    fn failure_uses_error_display() {
        let snapshot = ClipboardSnapshot::failure(ClipboardError::Acquisition);
        assert_eq!(snapshot.kind(), "error");
        assert_eq!(
            snapshot,
            ClipboardSnapshot::Failure {
                message: "Failed to open clipboard".to_string()
            }
        );
    }
}
