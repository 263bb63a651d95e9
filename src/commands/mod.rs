pub mod history;
pub mod serve;
pub mod uninstall;

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::modules::common::config::UninstallConfig;
use crate::modules::notifier::{DesktopNotifier, LogNotifier, Notifier};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 在系统总线上运行卸载服务
    Serve(serve::ServeCommand),

    /// 在前台卸载一个软件包
    Uninstall(uninstall::UninstallCommand),

    /// 查看卸载历史
    History(history::HistoryCommand),
}

/// 卸载流程相关的公共参数
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// 根据文件路径查询所属包的程序
    #[arg(long, env = "DEB_UNINSTALLER_RESOLVER", default_value = "dpkg")]
    pub resolver: String,

    /// 提权程序
    #[arg(long, env = "DEB_UNINSTALLER_ELEVATION", default_value = "pkexec")]
    pub elevation: String,

    /// 包管理工具
    #[arg(long, env = "DEB_UNINSTALLER_PACKAGE_TOOL", default_value = "apt")]
    pub package_tool: String,

    /// 单个阶段的超时时间 (秒)，不指定则不限制
    #[arg(long, env = "DEB_UNINSTALLER_STAGE_TIMEOUT")]
    pub stage_timeout: Option<u64>,

    /// 不发送桌面通知，只写日志
    #[arg(long)]
    pub no_notify: bool,
}

impl ConfigArgs {
    pub fn to_config(&self) -> UninstallConfig {
        UninstallConfig {
            resolver_program: self.resolver.clone(),
            elevation_program: self.elevation.clone(),
            package_tool: self.package_tool.clone(),
            stage_timeout: self.stage_timeout.map(Duration::from_secs),
        }
    }

    /// 连接桌面通知服务，失败时退回到只写日志
    pub async fn notifier(&self) -> Arc<dyn Notifier> {
        if self.no_notify {
            return Arc::new(LogNotifier);
        }

        match DesktopNotifier::connect().await {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::warn!("无法连接桌面通知服务，仅记录日志: {}", e);
                Arc::new(LogNotifier)
            }
        }
    }
}
