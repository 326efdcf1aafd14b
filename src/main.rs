//! # 剪贴板读取器 — 进程入口
//!
//! 只负责初始化日志、加载设置并启动行协议循环。
//! 日志写入 stderr，stdout 只承载协议响应。

use std::io;
use std::process::ExitCode;

use clipboard_reader::clipboard::{ClipboardReader, SystemClipboard};
use clipboard_reader::error;
use clipboard_reader::image_handler::ImageNormalizer;
use clipboard_reader::rpc::RpcServer;
use clipboard_reader::settings::ReaderSettings;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    error::route_panics_to_log();

    let settings = ReaderSettings::load_from_env();
    let config = settings.image_config();
    log::info!(
        "⚙️ 图片档位：{}，像素上限：{}",
        config.infer_performance_profile().as_str(),
        config.max_decoded_pixels
    );
    let normalizer = ImageNormalizer::new(config);
    let reader = ClipboardReader::new(SystemClipboard::new(), normalizer);
    let mut server = RpcServer::new(reader);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match server.serve(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 服务异常退出：{}", err);
            ExitCode::FAILURE
        }
    }
}
