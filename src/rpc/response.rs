//! # 响应格式化
//!
//! 每个快照恰好映射为一个 JSON-RPC 响应对象：
//! 文本 / 图片（Base64）/ 空 三种 `result`，或一个 `error`。

use serde::Serialize;
use serde_json::Value;

use crate::clipboard::ClipboardSnapshot;
use crate::codec;

pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

const EMPTY_MESSAGE: &str = "Clipboard is empty";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ClipboardResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipboardResult {
    Text {
        data: String,
        encoding: &'static str,
        size: usize,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: &'static str,
        width: u32,
        height: u32,
        size: usize,
    },
    Empty {
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    pub fn result(id: Value, result: ClipboardResult) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    /// 将快照映射为响应；图片字节在这里做 Base64 编码。
    pub fn from_snapshot(id: Value, snapshot: ClipboardSnapshot) -> Self {
        match snapshot {
            ClipboardSnapshot::Text { content } => {
                let size = content.len();
                Self::result(
                    id,
                    ClipboardResult::Text {
                        data: content,
                        encoding: "utf-8",
                        size,
                    },
                )
            }
            ClipboardSnapshot::Image {
                bytes,
                mime_type,
                width,
                height,
                size,
            } => Self::result(
                id,
                ClipboardResult::Image {
                    data: codec::encode(&bytes),
                    mime_type,
                    width,
                    height,
                    size,
                },
            ),
            ClipboardSnapshot::Empty => Self::result(
                id,
                ClipboardResult::Empty {
                    message: EMPTY_MESSAGE,
                },
            ),
            ClipboardSnapshot::Failure { message } => Self::error(id, INTERNAL_ERROR, message),
        }
    }
}
