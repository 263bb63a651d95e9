use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 卸载助手的通用错误
#[derive(Error, Debug)]
pub enum UninstallerError {
    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("已有卸载任务正在进行: {active}")]
    Busy { active: uuid::Uuid },

    #[error("卸载任务已取消")]
    Cancelled,

    #[error("卸载失败: {0}")]
    Operation(#[from] OperationError),

    #[error("D-Bus 错误: {0}")]
    DBus(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serde(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl From<zbus::Error> for UninstallerError {
    fn from(error: zbus::Error) -> Self {
        UninstallerError::DBus(error.to_string())
    }
}

impl From<serde_json::Error> for UninstallerError {
    fn from(error: serde_json::Error) -> Self {
        UninstallerError::Serde(error.to_string())
    }
}

/// 单次卸载流程中某个阶段产生的错误
///
/// 会随卸载结果一起写入历史记录，因此需要可克隆、可序列化。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationError {
    #[error("无法从 dpkg 输出中解析包名: {output:?}")]
    ResolutionFailed { output: String },

    #[error("非法的包名: {name:?}")]
    InvalidPackageName { name: String },

    #[error("无法启动进程 {program}: {reason}")]
    ProcessLaunchFailed { program: String, reason: String },

    #[error("进程 {program} 返回非零退出码: {code}")]
    ProcessExitedNonZero { program: String, code: i32 },

    #[error("进程 {program} 异常终止")]
    ProcessAbnormalTermination { program: String },

    #[error("进程 {program} 超时 ({seconds} 秒)")]
    StageTimeout { program: String, seconds: u64 },
}
