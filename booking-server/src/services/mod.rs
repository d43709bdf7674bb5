//! 服务模块
//!
//! - [`notify`] - 确认通知派发（fire-and-forget）

pub mod notify;

pub use notify::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
