//! 卸载状态机：解析包名 → 卸载 → 清理依赖
//!
//! 每个阶段只运行一个外部进程，阶段结果交给对应的转换函数决定下一个状态。

use tokio::sync::watch;

use super::models::{OperationContext, OperationOutcome, OperationState, OperationStatus, PackageName};
use super::resolve;
use crate::modules::common::config::UninstallConfig;
use crate::modules::common::error::OperationError;
use crate::modules::notifier::{Notifier, NotifyKind};
use crate::modules::runner::{ProcessOutput, ProcessRunner};

pub struct Pipeline<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub notifier: &'a dyn Notifier,
    pub config: &'a UninstallConfig,
}

impl<'a> Pipeline<'a> {
    /// 驱动一次卸载直至结束，并发送最终通知
    pub async fn run(
        &self,
        mut ctx: OperationContext,
        status: &watch::Sender<OperationStatus>,
    ) -> OperationOutcome {
        tracing::info!("[{}] 收到卸载请求: {}", ctx.id, ctx.request.as_str());

        match self.drive(&mut ctx, status).await {
            Ok(()) => {
                self.enter(&mut ctx, OperationState::Succeeded, status);
                self.notifier.notify(NotifyKind::Success, ctx.subject());
                tracing::info!("[{}] 卸载成功: {}", ctx.id, ctx.subject());
                ctx.finish(None)
            }
            Err(error) => {
                self.enter(&mut ctx, OperationState::Failed, status);
                self.notifier.notify(NotifyKind::Failure, ctx.subject());
                tracing::warn!("[{}] 卸载失败: {}", ctx.id, error);
                ctx.finish(Some(error))
            }
        }
    }

    async fn drive(
        &self,
        ctx: &mut OperationContext,
        status: &watch::Sender<OperationStatus>,
    ) -> Result<(), OperationError> {
        let package = if ctx.request.is_file_path() {
            self.enter(ctx, OperationState::ResolvingName, status);
            let output = self
                .run_stage(self.config.resolve_command(ctx.request.as_str()))
                .await;
            resolve::on_name_resolved(&output)?
        } else {
            PackageName::parse(ctx.request.as_str())?
        };
        tracing::info!("[{}] 包名: {}", ctx.id, package);
        ctx.package = Some(package);

        self.enter(ctx, OperationState::Removing, status);
        self.notifier.notify(NotifyKind::Uninstalling, ctx.subject());
        let output = self
            .run_stage(self.config.remove_command(ctx.subject()))
            .await;
        on_removed(&output)?;

        self.enter(ctx, OperationState::CleaningDependencies, status);
        let output = self.run_stage(self.config.autoremove_command()).await;
        ctx.cleanup_warning = on_dependencies_cleaned(&output);
        if let Some(warning) = &ctx.cleanup_warning {
            // 主包已卸载，依赖清理失败不影响结果
            tracing::warn!("[{}] 清理依赖失败: {}", ctx.id, warning);
        }

        Ok(())
    }

    fn enter(
        &self,
        ctx: &mut OperationContext,
        state: OperationState,
        status: &watch::Sender<OperationStatus>,
    ) {
        tracing::debug!("[{}] {} -> {}", ctx.id, ctx.state, state);
        ctx.state = state;
        status.send_replace(ctx.status());
    }

    async fn run_stage(&self, (program, args): (String, Vec<String>)) -> ProcessOutput {
        match self.config.stage_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.runner.run(&program, &args)).await {
                    Ok(output) => output,
                    // 超时后 run future 被丢弃，子进程随之被杀死
                    Err(_) => ProcessOutput::timed_out(program, limit.as_secs()),
                }
            }
            None => self.runner.run(&program, &args).await,
        }
    }
}

/// 卸载阶段结束后的状态转换
fn on_removed(output: &ProcessOutput) -> Result<(), OperationError> {
    match output.as_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// 清理依赖阶段结束后的状态转换，失败只作为警告返回
fn on_dependencies_cleaned(output: &ProcessOutput) -> Option<OperationError> {
    output.as_error()
}
