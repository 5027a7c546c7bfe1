//! ZCurve 命令行入口
//!
//! 用法：`zcurve <input.json> [output.json]`
//!
//! 读取覆盖记录和参数，执行一次合并与放置，把结果写到输出文件，
//! 未指定输出文件时写到标准输出。

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use zcurve_core::pipeline::run;
use zcurve_file::{load_input, save_output, write_output};

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，避免干扰标准输出上的结果）
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let mut args = std::env::args_os().skip(1);
    let Some(input_path) = args.next().map(PathBuf::from) else {
        bail!("usage: zcurve <input.json> [output.json]");
    };
    let output_path = args.next().map(PathBuf::from);

    info!("Starting ZCurve...");

    let input = load_input(&input_path)
        .with_context(|| format!("failed to load input {}", input_path.display()))?;

    let output = run(&input, Vec::new());
    for error in &output.errors {
        warn!("{}", error);
    }

    match output_path {
        Some(path) => save_output(&output, &path)
            .with_context(|| format!("failed to save output {}", path.display()))?,
        None => write_output(&output, std::io::stdout().lock())?,
    }

    Ok(())
}
