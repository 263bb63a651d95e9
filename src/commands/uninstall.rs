//! uninstall 命令 - 在前台卸载软件包

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use super::ConfigArgs;
use crate::modules::common::error::{OperationError, UninstallerError};
use crate::modules::common::utils;
use crate::modules::orchestrator::models::OperationOutcome;
use crate::modules::orchestrator::Orchestrator;
use crate::modules::reporter::HistoryStore;
use crate::modules::runner::SystemProcessRunner;

#[derive(Parser, Debug)]
pub struct UninstallCommand {
    /// 软件包名或已安装文件的绝对路径
    pub content: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// 不记录卸载历史
    #[arg(long)]
    pub no_history: bool,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: UninstallCommand) -> Result<()> {
    let config = cmd.config.to_config();
    config.validate()?;
    let elevation_program = config.elevation_program.clone();

    let runner = Arc::new(SystemProcessRunner::new());
    let notifier = cmd.config.notifier().await;

    let orchestrator = if cmd.no_history {
        Orchestrator::new(runner, notifier, config)
    } else {
        Orchestrator::with_history(runner, notifier, config, HistoryStore::open_default()?)
    };

    if cmd.format != "json" {
        println!("=== 卸载: {} ===\n", cmd.content);
    }

    let ticket = orchestrator.submit(cmd.content.clone())?;
    let outcome = tokio::select! {
        outcome = ticket.wait() => outcome?,
        _ = tokio::signal::ctrl_c() => {
            // 确认进程已被杀死后才退出
            orchestrator.shutdown().await;
            return Err(UninstallerError::Cancelled.into());
        }
    };

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_outcome(&outcome, &elevation_program),
    }

    match outcome.error {
        Some(error) => Err(UninstallerError::Operation(error).into()),
        None => Ok(()),
    }
}

fn print_outcome(outcome: &OperationOutcome, elevation_program: &str) {
    println!("  - 操作 ID: {}", outcome.id);
    println!(
        "  - 包名: {}",
        outcome.package.as_deref().unwrap_or("(未解析)")
    );
    println!("  - 结果: {}", outcome.state);
    println!("  - 耗时: {}", utils::format_duration(outcome.duration_millis()));

    if let Some(error) = &outcome.error {
        println!("  - 错误: {}", describe_error(error, elevation_program));
    }
    if let Some(warning) = &outcome.cleanup_warning {
        println!("  - 警告: 依赖清理失败 ({})", warning);
    }
    println!();
}

/// 为常见错误补充提示
fn describe_error(error: &OperationError, elevation_program: &str) -> String {
    match error {
        OperationError::ProcessExitedNonZero { program, code: 126 | 127 }
            if program == elevation_program =>
        {
            format!("{} (授权被拒绝或取消)", error)
        }
        OperationError::ResolutionFailed { .. } => format!("{} (该文件可能不属于任何软件包)", error),
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_error_adds_hint_for_denied_authorization() {
        let denied = OperationError::ProcessExitedNonZero {
            program: "pkexec".to_string(),
            code: 126,
        };
        assert!(describe_error(&denied, "pkexec").contains("授权被拒绝"));

        let apt_failed = OperationError::ProcessExitedNonZero {
            program: "apt".to_string(),
            code: 100,
        };
        assert_eq!(describe_error(&apt_failed, "pkexec"), apt_failed.to_string());
    }

    #[test]
    fn describe_error_follows_configured_elevation_program() {
        let denied = OperationError::ProcessExitedNonZero {
            program: "sudo".to_string(),
            code: 126,
        };
        assert!(describe_error(&denied, "sudo").contains("授权被拒绝"));
        assert_eq!(describe_error(&denied, "pkexec"), denied.to_string());
    }
}
