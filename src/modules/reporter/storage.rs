//! 卸载历史持久化存储
//!
//! 每个结束的卸载操作追加一条记录，按时间顺序保存在 JSON 文件中。
//! 服务进程与命令行可能同时写入，写入时持有旁边 `.lock` 文件的排他锁，
//! 并通过临时文件改名替换，读取方不会看到写了一半的文件。

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::models::HistoryQuery;
use crate::modules::common::error::UninstallerError;
use crate::modules::common::utils;
use crate::modules::orchestrator::models::OperationOutcome;

/// 最多保留的记录数
pub const MAX_HISTORY_ENTRIES: usize = 200;

pub const HISTORY_FILE_NAME: &str = "history.json";

#[cfg(test)]
pub(crate) static TEST_STORAGE_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 使用默认存储目录下的历史文件
    pub fn open_default() -> Result<Self, UninstallerError> {
        Ok(Self::new(utils::get_storage_dir()?.join(HISTORY_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取全部记录，文件不存在时返回空列表
    pub fn load(&self) -> Result<Vec<OperationOutcome>, UninstallerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let outcomes = serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("历史记录文件损坏，已忽略 {}: {}", self.path.display(), e);
            Vec::new()
        });
        Ok(outcomes)
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(extension);
        PathBuf::from(name)
    }

    /// 追加一条记录
    pub fn record(&self, outcome: &OperationOutcome) -> Result<(), UninstallerError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // 锁在 lock_file 关闭时释放
        let lock_file = File::create(self.sibling(".lock"))?;
        lock_file.lock_exclusive()?;

        let mut outcomes = self.load()?;
        outcomes.retain(|existing| existing.id != outcome.id);
        outcomes.push(outcome.clone());

        if outcomes.len() > MAX_HISTORY_ENTRIES {
            let excess = outcomes.len() - MAX_HISTORY_ENTRIES;
            outcomes.drain(..excess);
        }

        let content = serde_json::to_string_pretty(&outcomes)?;
        let tmp_path = self.sibling(".tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        drop(lock_file);

        tracing::debug!("已写入卸载历史: {} ({})", outcome.id, outcome.state);
        Ok(())
    }

    /// 查询记录，最新的在前
    pub fn query(&self, query: &HistoryQuery) -> Result<Vec<OperationOutcome>, UninstallerError> {
        let mut outcomes: Vec<OperationOutcome> = self
            .load()?
            .into_iter()
            .filter(|outcome| query.matches(outcome))
            .collect();

        outcomes.reverse();
        if query.limit > 0 {
            outcomes.truncate(query.limit);
        }
        Ok(outcomes)
    }
}
