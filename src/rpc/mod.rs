//! JSON-RPC 行协议模块
//!
//! # 设计思路
//!
//! 进程由上层客户端拉起，标准输入每行一个请求，标准输出每行一个响应：
//!
//! ```text
//! stdin 行 ──parse_request──► Call ──ClipboardReader──► ClipboardSnapshot ──RpcResponse──► stdout 行
//! ```
//!
//! # 实现思路
//!
//! - 请求严格串行处理，一次读取完成后才处理下一行。
//! - 单个请求内的 panic 被捕获并转换为 `-32603` 错误，循环继续。
//!   默认 panic 钩子仍会写 stderr，进程入口通过 `error::route_panics_to_log` 把它改为走日志。
//! - 写标准输出失败意味着客户端已经离开，结束循环并把错误交给调用方。

mod request;
mod response;

use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use crate::clipboard::{ClipboardBackend, ClipboardReader};
use crate::error::{AppError, panic_message};

pub use request::{Call, READ_CLIPBOARD, Request, parse_request};
pub use response::{
    ClipboardResult, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, RpcError, RpcResponse,
};

/// 行协议服务端。
pub struct RpcServer<B: ClipboardBackend> {
    reader: ClipboardReader<B>,
}

impl<B: ClipboardBackend> RpcServer<B> {
    pub fn new(reader: ClipboardReader<B>) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &ClipboardReader<B> {
        &self.reader
    }

    /// 处理一行输入；空行返回 `None`。
    pub fn handle_line(&mut self, line: &str) -> Result<Option<String>, AppError> {
        let line = line.trim_matches(|c: char| c == '\r' || c == '\n');
        if line.trim().is_empty() {
            return Ok(None);
        }

        let response = self.dispatch(parse_request(line));
        Ok(Some(serde_json::to_string(&response)?))
    }

    fn dispatch(&mut self, request: Request) -> RpcResponse {
        let Request { id, call } = request;

        match call {
            Call::ReadClipboard(format) => {
                let reader = &mut self.reader;
                match panic::catch_unwind(AssertUnwindSafe(|| reader.read_with(format))) {
                    Ok(snapshot) => RpcResponse::from_snapshot(id, snapshot),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::error!("💥 处理请求时发生异常：{}", message);
                        RpcResponse::error(id, INTERNAL_ERROR, message)
                    }
                }
            }
            Call::InvalidParams(reason) => {
                log::warn!("⚠️ 请求参数无效：{}", reason);
                RpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", reason))
            }
            Call::UnknownMethod => RpcResponse::error(id, METHOD_NOT_FOUND, "Unknown method"),
        }
    }

    /// 循环读取请求直到输入结束。
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), AppError> {
        log::info!("🚀 剪贴板读取服务已启动");

        for chunk in input.split(b'\n') {
            let chunk = chunk?;
            let line = String::from_utf8_lossy(&chunk);

            if let Some(response) = self.handle_line(&line)? {
                output.write_all(response.as_bytes())?;
                output.write_all(b"\n")?;
                output.flush()?;
            }
        }

        log::info!("👋 输入已结束，服务退出");
        Ok(())
    }
}
