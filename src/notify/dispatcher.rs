// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Background delivery of ownership notifications.
//!
//! Request handlers push into a [`NotificationQueue`] and return immediately;
//! a [`NotificationDispatcher`] task drains the queue and calls the
//! [`Notifier`]. Delivery failures are logged and dropped, so they can never
//! change a verification result already returned to the client.
//!
//! ## Backpressure
//!
//! Up to [`MAX_IN_FLIGHT`] sends run concurrently. Once that many are pending
//! the dispatcher stops reading the queue until one finishes; the queue itself
//! is unbounded, so a relay that stays slow (each send is capped by the mail
//! client timeout) lets it grow in memory until the relay recovers.
//!
//! ## Shutdown
//!
//! The dispatcher stops when its `CancellationToken` is cancelled (after
//! delivering whatever is already queued) or when every queue handle has been
//! dropped. In both cases it waits for in-flight sends to finish.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{Notifier, OwnershipNotification};

/// Maximum concurrent notifier calls.
pub const MAX_IN_FLIGHT: usize = 8;

/// Cloneable sending side of the notification channel.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<OwnershipNotification>,
}

impl NotificationQueue {
    /// Create a queue and the receiver a [`NotificationDispatcher`] drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OwnershipNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Enqueue without blocking. Never fails the caller.
    pub fn enqueue(&self, notification: OwnershipNotification) {
        let id = notification.id;
        if self.sender.send(notification).is_err() {
            warn!(notification_id = %id, "Notification dispatcher stopped; dropping notification");
        }
    }
}

/// Background task delivering queued notifications.
pub struct NotificationDispatcher<N: Notifier> {
    notifier: Arc<N>,
    receiver: mpsc::UnboundedReceiver<OwnershipNotification>,
    in_flight: JoinSet<()>,
}

impl<N: Notifier> NotificationDispatcher<N> {
    pub fn new(notifier: N, receiver: mpsc::UnboundedReceiver<OwnershipNotification>) -> Self {
        Self {
            notifier: Arc::new(notifier),
            receiver,
            in_flight: JoinSet::new(),
        }
    }

    /// Run until cancelled or until all queue handles are dropped.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(dispatcher.run(shutdown.clone()));
    /// ```
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(max_in_flight = MAX_IN_FLIGHT, "Notification dispatcher starting");

        loop {
            tokio::select! {
                next = self.receiver.recv() => match next {
                    Some(notification) => self.dispatch(notification).await,
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    while let Ok(notification) = self.receiver.try_recv() {
                        self.dispatch(notification).await;
                    }
                    break;
                }
            }
        }

        while self.in_flight.join_next().await.is_some() {}
        info!("Notification dispatcher shutting down");
    }

    /// Spawn one delivery, first waiting for a free slot.
    async fn dispatch(&mut self, notification: OwnershipNotification) {
        while self.in_flight.len() >= MAX_IN_FLIGHT {
            if let Some(Err(e)) = self.in_flight.join_next().await {
                warn!(error = %e, "Notification delivery task failed");
            }
        }

        let notifier = Arc::clone(&self.notifier);
        self.in_flight
            .spawn(async move { deliver(notifier.as_ref(), notification).await });
    }
}

async fn deliver<N: Notifier>(notifier: &N, notification: OwnershipNotification) {
    match notifier.send(&notification).await {
        Ok(()) => info!(
            notification_id = %notification.id,
            address = %notification.address,
            "Ownership notification sent"
        ),
        Err(e) => warn!(
            notification_id = %notification.id,
            address = %notification.address,
            error = %e,
            "Failed to send ownership notification"
        ),
    }
}
