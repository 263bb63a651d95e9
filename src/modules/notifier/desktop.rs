//! freedesktop 桌面通知 (org.freedesktop.Notifications)

use std::collections::HashMap;

use zbus::zvariant::Value;

use super::{Notification, Notifier, NotifyKind};
use crate::modules::common::error::UninstallerError;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications",
    gen_blocking = false
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// 通过会话总线发送桌面通知
#[derive(Clone)]
pub struct DesktopNotifier {
    proxy: NotificationsProxy<'static>,
}

impl DesktopNotifier {
    /// 连接会话总线上的通知服务
    pub async fn connect() -> Result<Self, UninstallerError> {
        let connection = zbus::Connection::session().await?;
        let proxy = NotificationsProxy::new(&connection).await?;
        Ok(Self { proxy })
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, kind: NotifyKind, subject: &str) {
        let notification = Notification::new(kind, subject);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("没有可用的异步运行时，丢弃通知: {} {}", kind, subject);
                return;
            }
        };

        let proxy = self.proxy.clone();
        handle.spawn(async move {
            // 包名放在 summary 位置，状态文字放在 body 位置
            let result = proxy
                .notify(
                    notification.app_name,
                    notification.replaces_id,
                    notification.icon,
                    &notification.subject,
                    notification.message,
                    &[],
                    HashMap::new(),
                    notification.timeout,
                )
                .await;

            if let Err(e) = result {
                tracing::warn!("发送桌面通知失败: {}", e);
            }
        });
    }
}
