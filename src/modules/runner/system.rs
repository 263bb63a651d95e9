use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{ProcessOutput, ProcessRunner};

/// 基于 `tokio::process` 的执行器
///
/// 子进程设置了 `kill_on_drop`，执行中的 future 被丢弃时子进程随之被杀死。
#[derive(Debug, Default, Clone)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> ProcessOutput {
        tracing::debug!("启动进程: {} {:?}", program, args);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("无法启动进程 {}: {}", program, e);
                return ProcessOutput::failed_to_start(program, e.to_string());
            }
        };

        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("等待进程 {} 结束失败: {}", program, e);
                return ProcessOutput::abnormal(program);
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(code) => {
                if code != 0 && !stderr.trim().is_empty() {
                    tracing::debug!("{} 退出码 {}, stderr: {}", program, code, stderr.trim());
                }
                ProcessOutput::exited(program, code, String::from_utf8_lossy(&output.stdout))
            }
            None => {
                // 没有退出码说明进程被信号终止
                tracing::debug!("{} 被信号终止: {}", program, output.status);
                ProcessOutput::abnormal(program)
            }
        }
    }
}
