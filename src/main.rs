use anyhow::Result;
use clap::Parser;
use std::process;

use deb_uninstaller_lib::commands;
use deb_uninstaller_lib::modules;

#[derive(Parser, Debug)]
#[command(name = "deb-uninstaller")]
#[command(about = "Debian 软件包卸载助手", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志
    modules::common::logging::init_logging(cli.verbose);

    // 执行命令
    let result = match cli.command {
        commands::Command::Serve(cmd) => commands::serve::execute(cmd).await,
        commands::Command::Uninstall(cmd) => commands::uninstall::execute(cmd).await,
        commands::Command::History(cmd) => commands::history::execute(cmd).await,
    };

    match result {
        Ok(_) => {}
        Err(e) => {
            if cli.verbose {
                tracing::error!("错误: {:#}", e);
            } else {
                eprintln!("错误: {}", e);
            }
            process::exit(1);
        }
    }

    Ok(())
}
