use crate::modules::orchestrator::models::OperationOutcome;

/// 历史记录查询参数
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// 按包名或请求内容过滤（不区分大小写）
    pub package: Option<String>,
    /// 最多返回条数，0 表示不限制
    pub limit: usize,
}

impl HistoryQuery {
    pub fn matches(&self, outcome: &OperationOutcome) -> bool {
        match &self.package {
            Some(pattern) => {
                let pattern = pattern.to_lowercase();
                outcome.request.to_lowercase().contains(&pattern)
                    || outcome
                        .package
                        .as_ref()
                        .map(|name| name.to_lowercase().contains(&pattern))
                        .unwrap_or(false)
            }
            None => true,
        }
    }
}

/// 历史记录汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cleanup_warnings: usize,
}

impl HistorySummary {
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            cleanup_warnings: outcomes
                .iter()
                .filter(|o| o.cleanup_warning.is_some())
                .count(),
        }
    }
}
