//! 卸载进度通知
//!
//! 通知是 fire-and-forget 的：发送失败只记录日志，不影响卸载流程。

pub mod desktop;

pub use desktop::DesktopNotifier;

/// 通知中使用的应用名
pub const APP_NAME: &str = "cutefish-daemon";

/// 通知显示时长（由通知服务解释单位）
pub const NOTIFY_TIMEOUT: i32 = 10;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Uninstalling,
    Failure,
    Success,
}

impl NotifyKind {
    /// 通知图标
    pub fn icon(self) -> &'static str {
        match self {
            NotifyKind::Uninstalling => "cutefish-installer",
            NotifyKind::Failure => "dialog-error",
            NotifyKind::Success => "process-completed-symbolic",
        }
    }

    /// 通知中显示的状态文字
    pub fn message(self) -> &'static str {
        match self {
            NotifyKind::Uninstalling => "正在卸载",
            NotifyKind::Failure => "卸载失败",
            NotifyKind::Success => "卸载成功",
        }
    }
}

impl std::fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// 发往通知服务的完整内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub app_name: &'static str,
    pub replaces_id: u32,
    pub icon: &'static str,
    /// 包名，未解析出包名时为空
    pub subject: String,
    pub message: &'static str,
    pub timeout: i32,
}

impl Notification {
    pub fn new(kind: NotifyKind, subject: &str) -> Self {
        Self {
            app_name: APP_NAME,
            replaces_id: 0,
            icon: kind.icon(),
            subject: subject.to_string(),
            message: kind.message(),
            timeout: NOTIFY_TIMEOUT,
        }
    }
}

/// 通知发送端
pub trait Notifier: Send + Sync {
    /// 发送通知，不等待结果
    fn notify(&self, kind: NotifyKind, subject: &str);
}

/// 只写日志的通知器，会话总线不可用时使用
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotifyKind, subject: &str) {
        let notification = Notification::new(kind, subject);
        tracing::info!(
            "[通知] {} {}: {}",
            notification.icon,
            notification.message,
            notification.subject
        );
    }
}
