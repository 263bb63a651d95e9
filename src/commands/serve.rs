//! serve 命令 - 在系统总线上提供卸载服务

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use super::ConfigArgs;
use crate::modules::orchestrator::Orchestrator;
use crate::modules::reporter::HistoryStore;
use crate::modules::runner::SystemProcessRunner;
use crate::modules::service;

#[derive(Parser, Debug)]
pub struct ServeCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// 不记录卸载历史
    #[arg(long)]
    pub no_history: bool,
}

pub async fn execute(cmd: ServeCommand) -> Result<()> {
    let config = cmd.config.to_config();
    config.validate()?;
    tracing::info!("启动卸载服务, 配置: {:?}", config);

    let runner = Arc::new(SystemProcessRunner::new());
    let notifier = cmd.config.notifier().await;

    let orchestrator = if cmd.no_history {
        Orchestrator::new(runner, notifier, config)
    } else {
        let history = HistoryStore::open_default()?;
        tracing::info!("卸载历史: {}", history.path().display());
        Orchestrator::with_history(runner, notifier, config, history)
    };
    let orchestrator = Arc::new(orchestrator);

    let connection = service::register(orchestrator.clone())
        .await
        .context("注册 D-Bus 服务失败")?;

    wait_for_shutdown().await?;

    tracing::info!("收到退出信号，停止服务");
    if orchestrator.shutdown().await {
        tracing::warn!("已终止正在进行的卸载操作");
    }
    drop(connection);

    Ok(())
}

/// 等待 Ctrl-C 或 SIGTERM
async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}
