//! # 文本解码
//!
//! - `CF_UNICODETEXT`：UTF-16LE，以 `\0` 结尾，转为 UTF-8；非法代理对视为转换失败。
//! - `CF_TEXT`：单字节文本，以 `\0` 结尾；合法 UTF-8 直接使用，否则按 Latin-1 逐字节映射。
//!
//! 锁定的内存块可能比实际文本长（`GlobalSize` 按分配粒度取整），因此都以第一个 `\0` 为界。

use super::ClipboardError;

/// 解码宽字符文本。
pub fn decode_wide(bytes: &[u8]) -> Result<String, ClipboardError> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();

    String::from_utf16(&units).map_err(|e| {
        log::warn!("❌ 宽字符文本转换 UTF-8 失败：{}", e);
        ClipboardError::Encoding
    })
}

/// 解码旧式单字节文本。
pub fn decode_legacy(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let raw = &bytes[..end];

    match std::str::from_utf8(raw) {
        Ok(text) => text.to_owned(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

/// 将文本编码为 `\0` 结尾的 UTF-16LE 字节（宽字符剪贴板格式）。
pub fn encode_wide(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
