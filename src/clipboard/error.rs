//! # 剪贴板错误模型
//!
//! `Display` 文本会原样进入 JSON-RPC 错误响应，因此保持英文且稳定。

use super::ClipboardFormat;

/// 剪贴板读取过程中的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// 无法取得剪贴板独占访问（通常被其他进程占用，可稍后重试）。
    #[error("Failed to open clipboard")]
    Acquisition,

    /// 请求的格式当前不可用（取不到数据句柄）。
    #[error("No {} data available", .0.kind())]
    FormatUnavailable(ClipboardFormat),

    /// 数据句柄存在但无法锁定内存。
    #[error("Failed to lock clipboard {} data", .0.kind())]
    Lock(ClipboardFormat),

    /// 宽字符与旧式文本句柄均不可用。
    #[error("No text data available")]
    NoTextData,

    /// 文本无法转换为 UTF-8。
    #[error("Failed to convert text to UTF-8")]
    Encoding,

    /// 剪贴板宣称有图片，但两条转换路径都失败。
    #[error("Failed to read image from clipboard")]
    Conversion,

    /// 系统图形接口调用失败（仅用于日志，读取流程会将其视为转换失败）。
    #[error("Graphics subsystem error: {0}")]
    Graphics(String),
}

#[cfg(test)]
mod tests {
    use super::{ClipboardError, ClipboardFormat};

    #[test]
    fn protocol_facing_messages_are_stable() {
        assert_eq!(ClipboardError::Acquisition.to_string(), "Failed to open clipboard");
        assert_eq!(ClipboardError::NoTextData.to_string(), "No text data available");
        assert_eq!(
            ClipboardError::Encoding.to_string(),
            "Failed to convert text to UTF-8"
        );
        assert_eq!(
            ClipboardError::Lock(ClipboardFormat::UnicodeText).to_string(),
            "Failed to lock clipboard text data"
        );
        assert_eq!(
            ClipboardError::Conversion.to_string(),
            "Failed to read image from clipboard"
        );
    }
}
