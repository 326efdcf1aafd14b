//! # 请求解析
//!
//! 优先按 JSON 解析；不是合法 JSON 时退化为宽松扫描：
//! 用正则提取 `"id": <数字>`，行内包含 `read_clipboard` 即视为读取请求。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::clipboard::ReadFormat;

/// 唯一支持的方法名。
pub const READ_CLIPBOARD: &str = "read_clipboard";

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""id"\s*:\s*(\d+)"#).expect("请求 id 正则无效"));

/// 解析后的请求。
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// 关联 id，原样回写到响应。
    pub id: Value,
    pub call: Call,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadClipboard(ReadFormat),
    InvalidParams(String),
    UnknownMethod,
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ReadParams {
    #[serde(default)]
    format: ReadFormat,
}

fn default_id() -> Value {
    Value::from(1)
}

/// 解析一行请求。
pub fn parse_request(line: &str) -> Request {
    match serde_json::from_str::<RawRequest>(line) {
        Ok(raw) => from_json(raw),
        Err(err) => {
            log::debug!("请求不是合法 JSON，改用宽松解析: {}", err);
            lenient(line)
        }
    }
}

fn from_json(raw: RawRequest) -> Request {
    let id = match raw.id {
        Some(id @ (Value::Number(_) | Value::String(_))) => id,
        _ => default_id(),
    };

    if raw.method.as_deref() != Some(READ_CLIPBOARD) {
        return Request {
            id,
            call: Call::UnknownMethod,
        };
    }

    let call = match raw.params {
        None | Some(Value::Null) => Call::ReadClipboard(ReadFormat::Auto),
        Some(params) => match serde_json::from_value::<ReadParams>(params) {
            Ok(params) => Call::ReadClipboard(params.format),
            Err(err) => Call::InvalidParams(err.to_string()),
        },
    };

    Request { id, call }
}

fn lenient(line: &str) -> Request {
    let id = ID_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(Value::from)
        .unwrap_or_else(default_id);

    let call = if line.contains(READ_CLIPBOARD) {
        Call::ReadClipboard(ReadFormat::Auto)
    } else {
        Call::UnknownMethod
    };

    Request { id, call }
}
