//! 系统总线上的卸载服务
//!
//! 服务名 `com.cutefish.Daemon`，对象 `/AppManager`，
//! 接口 `com.cutefish.AppManager` 提供 `Uninstall(content)` 方法。

use std::sync::Arc;

use crate::modules::common::error::UninstallerError;
use crate::modules::orchestrator::Orchestrator;

pub const SERVICE_NAME: &str = "com.cutefish.Daemon";
pub const OBJECT_PATH: &str = "/AppManager";

pub struct AppManagerService {
    orchestrator: Arc<Orchestrator>,
}

impl AppManagerService {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[zbus::interface(name = "com.cutefish.AppManager")]
impl AppManagerService {
    /// 卸载软件包
    ///
    /// `content` 为软件包名或已安装文件的路径。结果只通过桌面通知反馈；
    /// 已有操作进行中时以 D-Bus 错误拒绝。
    async fn uninstall(&self, content: String) -> zbus::fdo::Result<()> {
        match self.orchestrator.submit(content.clone()) {
            Ok(ticket) => {
                tracing::info!("已接受卸载请求 {}: {}", ticket.id, content);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("卸载请求被拒绝 {}: {}", content, e);
                Err(zbus::fdo::Error::Failed(e.to_string()))
            }
        }
    }
}

/// 在系统总线注册服务，返回的连接需保持存活
pub async fn register(orchestrator: Arc<Orchestrator>) -> Result<zbus::Connection, UninstallerError> {
    let service = AppManagerService::new(orchestrator);

    let connection = zbus::connection::Builder::system()?
        .name(SERVICE_NAME)?
        .serve_at(OBJECT_PATH, service)?
        .build()
        .await?;

    tracing::info!("D-Bus 服务已注册: {} {}", SERVICE_NAME, OBJECT_PATH);
    Ok(connection)
}
