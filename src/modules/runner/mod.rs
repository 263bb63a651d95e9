//! 外部进程执行
//!
//! 卸载流程中的每个阶段都通过 [`ProcessRunner`] 启动一个外部命令。
//! 参数始终以独立的 argv 传递，不经过 shell 解释。
//!
//! 取消语义：丢弃尚未完成的 `run` future 即请求强制终止，
//! 实现必须保证此时子进程被杀死（进程已退出时同样安全）。

pub mod system;

use async_trait::async_trait;

use crate::modules::common::error::OperationError;

pub use system::SystemProcessRunner;

/// 进程结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// 正常退出，退出码可用
    Normal,
    /// 被信号杀死或崩溃
    Abnormal,
    /// 进程未能启动
    FailedToStart,
    /// 超过阶段时限被终止
    TimedOut { seconds: u64 },
}

/// 一次进程执行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub program: String,
    pub exit_kind: ExitKind,
    pub exit_code: Option<i32>,
    pub stdout: String,
    /// 启动失败或超时时的说明
    pub error: Option<String>,
}

impl ProcessOutput {
    pub fn exited(program: impl Into<String>, code: i32, stdout: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_kind: ExitKind::Normal,
            exit_code: Some(code),
            stdout: stdout.into(),
            error: None,
        }
    }

    pub fn abnormal(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_kind: ExitKind::Abnormal,
            exit_code: None,
            stdout: String::new(),
            error: None,
        }
    }

    pub fn failed_to_start(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            exit_kind: ExitKind::FailedToStart,
            exit_code: None,
            stdout: String::new(),
            error: Some(reason.into()),
        }
    }

    pub fn timed_out(program: impl Into<String>, seconds: u64) -> Self {
        Self {
            program: program.into(),
            exit_kind: ExitKind::TimedOut { seconds },
            exit_code: None,
            stdout: String::new(),
            error: Some(format!("超过 {} 秒", seconds)),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_kind == ExitKind::Normal && self.exit_code == Some(0)
    }

    /// 将失败的执行结果映射为阶段错误，成功时返回 None
    pub fn as_error(&self) -> Option<OperationError> {
        let program = self.program.clone();
        match self.exit_kind {
            ExitKind::Normal => match self.exit_code {
                Some(0) => None,
                Some(code) => Some(OperationError::ProcessExitedNonZero { program, code }),
                None => Some(OperationError::ProcessAbnormalTermination { program }),
            },
            ExitKind::Abnormal => Some(OperationError::ProcessAbnormalTermination { program }),
            ExitKind::FailedToStart => Some(OperationError::ProcessLaunchFailed {
                program,
                reason: self.error.clone().unwrap_or_default(),
            }),
            ExitKind::TimedOut { seconds } => {
                Some(OperationError::StageTimeout { program, seconds })
            }
        }
    }
}

/// 外部进程执行器
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// 启动 `program args...` 并等待其结束
    ///
    /// 启动失败同样通过返回值报告 ([`ExitKind::FailedToStart`])。
    async fn run(&self, program: &str, args: &[String]) -> ProcessOutput;
}
