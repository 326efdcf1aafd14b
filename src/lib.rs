//! # 剪贴板读取器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            上层客户端 (spawn 子进程, stdin/stdout)        │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ JSON-RPC 2.0，每行一个对象
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            本进程 (Rust)                          │
//! │                                                          │
//! │  ├─ rpc ──────── 行协议：解析请求 · 格式化响应            │
//! │  │                                                       │
//! │  ├─ clipboard ── ClipboardReader 状态机 + ClipboardGuard │
//! │  │   ├─ win32          Win32 原生剪贴板 (Windows)         │
//! │  │   └─ fallback       arboard (其他平台)                 │
//! │  │                                                       │
//! │  ├─ image_handler      DIB / 位图对象 → PNG              │
//! │  ├─ codec              Base64 编解码                     │
//! │  ├─ settings           可选 JSON 设置文件                 │
//! │  └─ error              AppError (统一错误类型)            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` 与 panic 消息提取 |
//! | [`clipboard`] | 剪贴板后端抽象、RAII 关闭、按优先级读取快照 |
//! | [`image_handler`] | 位图解析、资源上限校验、PNG 规范化 |
//! | [`codec`] | 二进制与 Base64 文本互转 |
//! | [`rpc`] | 标准输入输出上的 JSON-RPC 行协议 |
//! | [`settings`] | 从环境变量指定的文件加载运行时设置 |

pub mod error;
pub mod clipboard;
pub mod codec;
pub mod image_handler;
pub mod rpc;
pub mod settings;
