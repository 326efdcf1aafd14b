//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片规范化链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

/// 图片规范化统一错误类型。
///
/// 读取流程只把它当作“图片路径失败”的信号，随后回退到文本提取。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("输入为空：{0}")]
    Empty(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("图形子系统错误：{0}")]
    Graphics(String),
}
