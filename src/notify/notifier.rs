// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notification transports.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::OwnershipNotification;
use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("mail relay returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers ownership notifications.
pub trait Notifier: Send + Sync + 'static {
    fn send(
        &self,
        notification: &OwnershipNotification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// JSON message accepted by the mail relay.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct MailMessage<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: String,
}

/// Sends notifications through an HTTP mail relay.
///
/// The owner's address and the monitoring mailbox (if configured) are both
/// recipients of the same message.
#[derive(Debug, Clone)]
pub struct MailApiNotifier {
    endpoint: url::Url,
    api_key: Option<String>,
    from: String,
    monitor_email: Option<String>,
    http: Client,
}

impl MailApiNotifier {
    pub fn new(
        endpoint: url::Url,
        api_key: Option<String>,
        from: impl Into<String>,
        monitor_email: Option<String>,
    ) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifyError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            api_key,
            from: from.into(),
            monitor_email,
            http,
        })
    }

    fn message<'a>(&'a self, notification: &'a OwnershipNotification) -> MailMessage<'a> {
        let mut to = vec![notification.email.as_str()];
        if let Some(monitor) = self.monitor_email.as_deref() {
            to.push(monitor);
        }

        MailMessage {
            from: &self.from,
            to,
            subject: notification.subject(),
            text: notification.text_body(),
        }
    }
}

impl Notifier for MailApiNotifier {
    async fn send(&self, notification: &OwnershipNotification) -> Result<(), NotifyError> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .json(&self.message(notification));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }

        Ok(())
    }
}

/// Records notifications in the log only. Used when no mail relay is set.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    monitor_email: Option<String>,
}

impl LogNotifier {
    pub fn new(monitor_email: Option<String>) -> Self {
        Self { monitor_email }
    }
}

impl Notifier for LogNotifier {
    async fn send(&self, notification: &OwnershipNotification) -> Result<(), NotifyError> {
        info!(
            notification_id = %notification.id,
            address = %notification.address,
            to = %notification.email,
            monitor = ?self.monitor_email,
            source_ip = %notification.source_ip,
            "Mail relay not configured; notification logged only"
        );
        Ok(())
    }
}

/// Notifier selected from configuration at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredNotifier {
    Mail(MailApiNotifier),
    Log(LogNotifier),
}

impl ConfiguredNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotifyError> {
        match &config.api_url {
            Some(url) => Ok(Self::Mail(MailApiNotifier::new(
                url.clone(),
                config.api_key.clone(),
                config.from.clone(),
                config.monitor_email.clone(),
            )?)),
            None => Ok(Self::Log(LogNotifier::new(config.monitor_email.clone()))),
        }
    }
}

impl Notifier for ConfiguredNotifier {
    async fn send(&self, notification: &OwnershipNotification) -> Result<(), NotifyError> {
        match self {
            Self::Mail(mail) => mail.send(notification).await,
            Self::Log(log) => log.send(notification).await,
        }
    }
}
