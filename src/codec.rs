//! # 文本传输编解码模块（Base64）
//!
//! ## 设计思路
//!
//! 图片字节需要嵌入单行 JSON 响应，因此统一编码为标准 Base64 文本。
//! 该模块与剪贴板、图片、协议均无耦合，只提供一对纯函数。
//!
//! ## 实现思路
//!
//! - `encode`：直接使用 `base64` crate 的 `STANDARD` 引擎（带 `=` 填充）。
//! - `decode`：先过滤掉字母表以外的字符（换行、空格等），遇到第一个 `=` 即停止，
//!   再交给宽松引擎解码（填充可有可无、允许尾部多余比特）。
//! - 解码永不失败：残缺的尾部分组只保留其中完整的字节。

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// 宽松解码引擎：容忍缺失填充与尾部非零比特。
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 将任意字节编码为可打印的 Base64 文本。
///
/// # 示例
/// ```
/// assert_eq!(clipboard_reader::codec::encode(b"Man"), "TWFu");
/// assert_eq!(clipboard_reader::codec::encode(b"M"), "TQ==");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 解码 `encode` 产生的文本。
///
/// 非字母表字符会被忽略，第一个 `=` 之后的内容全部丢弃。
///
/// # 示例
/// ```
/// let text = "SGVs\r\nbG8=";
/// assert_eq!(clipboard_reader::codec::decode(text), b"Hello");
/// ```
pub fn decode(text: &str) -> Vec<u8> {
    let mut symbols: Vec<u8> = text
        .bytes()
        .take_while(|&b| b != b'=')
        .filter(|&b| is_alphabet_symbol(b))
        .collect();

    // 单个残留符号只有 6 比特，凑不出完整字节
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }

    match LENIENT.decode(&symbols) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("⚠️ Base64 解码异常，返回空结果：{}", err);
            Vec::new()
        }
    }
}

fn is_alphabet_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}
