mod cli;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use sysadmin_view::config::Config;
use sysadmin_view::loader;
use sysadmin_view::render;
use sysadmin_view::runner::{DuctRunner, ProcessRunner, ReplayRunner};
use sysadmin_view::tui;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    // 配置优先级：命令行 > 环境变量 > 配置文件
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };
    let config = args.apply(config);
    let invocation = args.invocation(&config);

    let runner: Arc<dyn ProcessRunner> = match &args.input {
        Some(path) => Arc::new(ReplayRunner::new(path)),
        None => Arc::new(DuctRunner::new(&config.binary).with_timeout(config.timeout())),
    };

    if args.interactive() {
        return tui::run(runner, invocation, args.save.clone()).await;
    }

    let result =
        tokio::task::spawn_blocking(move || loader::load(runner.as_ref(), &invocation)).await?;
    let loaded = match result {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(stderr) = e.stderr() {
                eprintln!("{}", stderr);
            }
            return Err(e.into());
        }
    };

    if let Some(path) = &args.save {
        loaded.save_raw(path)?;
        log::info!("已保存原始响应到 {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&loaded.exit)?);
    } else {
        for line in render::exit_lines(&loaded.exit) {
            println!("{}", line);
        }
        if !loaded.stderr.is_empty() {
            eprintln!("{}", loaded.stderr);
        }
    }

    // 与 sysadmin 保持一致的退出码
    if !loaded.exit.succeeded() {
        std::process::exit(loaded.exit.exit_code());
    }

    Ok(())
}
