use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::common::error::OperationError;

/// 卸载流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Idle,
    ResolvingName,
    Removing,
    CleaningDependencies,
    Succeeded,
    Failed,
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationState::Idle => write!(f, "空闲"),
            OperationState::ResolvingName => write!(f, "解析包名"),
            OperationState::Removing => write!(f, "卸载中"),
            OperationState::CleaningDependencies => write!(f, "清理依赖"),
            OperationState::Succeeded => write!(f, "成功"),
            OperationState::Failed => write!(f, "失败"),
        }
    }
}

/// 卸载请求：已安装文件的绝对路径或包名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallRequest {
    content: String,
}

impl UninstallRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// 以 `/` 开头视为文件路径，需要先通过 dpkg 解析包名
    pub fn is_file_path(&self) -> bool {
        self.content.starts_with('/')
    }
}

/// 非空、可安全作为 apt 参数的包名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(raw: &str) -> Result<Self, OperationError> {
        let name = raw.trim();
        let invalid = || OperationError::InvalidPackageName {
            name: raw.to_string(),
        };

        if name.is_empty() {
            return Err(invalid());
        }

        // 以 `-` 开头的参数会被 apt 当作选项
        if name.starts_with('-') {
            return Err(invalid());
        }

        if name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == ',' || c == '/')
        {
            return Err(invalid());
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单次卸载操作的上下文，随状态机在各阶段间传递
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub id: uuid::Uuid,
    pub request: UninstallRequest,
    pub package: Option<PackageName>,
    pub state: OperationState,
    pub cleanup_warning: Option<OperationError>,
    pub started_at: DateTime<Utc>,
}

impl OperationContext {
    pub fn new(request: UninstallRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            request,
            package: None,
            state: OperationState::Idle,
            cleanup_warning: None,
            started_at: Utc::now(),
        }
    }

    /// 通知中使用的包名，尚未解析时为空
    pub fn subject(&self) -> &str {
        self.package.as_ref().map(|p| p.as_str()).unwrap_or("")
    }

    pub fn status(&self) -> OperationStatus {
        OperationStatus {
            id: self.id,
            request: self.request.as_str().to_string(),
            package: self.package.as_ref().map(|p| p.to_string()),
            state: self.state,
        }
    }

    pub fn finish(self, error: Option<OperationError>) -> OperationOutcome {
        OperationOutcome {
            id: self.id,
            request: self.request.as_str().to_string(),
            package: self.package.map(|p| p.0),
            state: self.state,
            error,
            cleanup_warning: self.cleanup_warning,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// 正在进行的操作的快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    pub id: uuid::Uuid,
    pub request: String,
    pub package: Option<String>,
    pub state: OperationState,
}

/// 已结束操作的结果，同时作为历史记录写入磁盘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub id: uuid::Uuid,
    pub request: String,
    pub package: Option<String>,
    pub state: OperationState,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub cleanup_warning: Option<OperationError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl OperationOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == OperationState::Succeeded
    }

    pub fn duration_millis(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
