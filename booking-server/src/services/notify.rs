//! 确认通知
//!
//! 通知是 fire-and-forget 协作方：预约成功与通知成败完全解耦，
//! 投递失败只记日志，不重试、不回滚、不上抛给调用者。
//!
//! 生产环境通过 `NOTIFY_WEBHOOK_URL` 指向邮件网关的 JSON webhook；
//! 未配置时退化为 [`LogNotifier`]（只记日志）。

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 通知投递错误 — 永远不会传播到预约调用方
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),
}

/// 通知接口
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, to: &str, subject: &str, body: &str)
        -> Result<(), NotifyError>;
}

/// 日志通知器 — 开发/测试默认实现
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_confirmation(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(to = %to, subject = %subject, "Confirmation notification (log only)");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Webhook 通知器 — POST JSON 到邮件网关
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_confirmation(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { to, subject, body })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(NotifyError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
