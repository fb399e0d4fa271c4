// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post-verification email notifications.

pub mod dispatcher;
pub mod notification;
pub mod notifier;

pub use dispatcher::{NotificationDispatcher, NotificationQueue};
pub use notification::OwnershipNotification;
pub use notifier::{ConfiguredNotifier, LogNotifier, MailApiNotifier, Notifier, NotifyError};
