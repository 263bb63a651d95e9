use anyhow::Result;
use clap::Parser;

use crate::modules::common::utils;
use crate::modules::orchestrator::models::OperationOutcome;
use crate::modules::reporter::{HistoryQuery, HistoryStore, HistorySummary};

#[derive(Parser, Debug)]
pub struct HistoryCommand {
    /// 按包名或文件路径过滤
    #[arg(short, long)]
    pub package: Option<String>,

    /// 最多显示条数 (0 为全部)
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: HistoryCommand) -> Result<()> {
    let store = HistoryStore::open_default()?;
    tracing::debug!("读取卸载历史: {}", store.path().display());

    let outcomes = store.query(&HistoryQuery {
        package: cmd.package,
        limit: cmd.limit,
    })?;

    match cmd.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        _ => {
            print_table(&outcomes);
        }
    }

    Ok(())
}

fn print_table(outcomes: &[OperationOutcome]) {
    if outcomes.is_empty() {
        println!("暂无卸载记录");
        return;
    }

    println!("\n{}", "=".repeat(100));
    println!(
        "{:<20} {:<30} {:<30} {:<8} {:<10}",
        "时间", "包名", "请求", "结果", "耗时"
    );
    println!("{}", "=".repeat(100));

    for o in outcomes {
        let state = if o.cleanup_warning.is_some() {
            format!("{}*", o.state)
        } else {
            o.state.to_string()
        };

        println!(
            "{:<20} {:<30} {:<30} {:<8} {:<10}",
            o.finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            utils::truncate_string(o.package.as_deref().unwrap_or("-"), 29),
            utils::truncate_string(&o.request, 29),
            state,
            utils::format_duration(o.duration_millis())
        );

        if let Some(error) = &o.error {
            println!("    {}", error);
        }
    }

    let summary = HistorySummary::from_outcomes(outcomes);
    println!("{}", "=".repeat(100));
    println!(
        "总计: {} 条, 成功 {}, 失败 {} (* 依赖清理失败: {})\n",
        summary.total, summary.succeeded, summary.failed, summary.cleanup_warnings
    );
}
