//! Notification fan-out. The dispatcher subscribes to the workflow event
//! bus at startup and writes inbox entries; the HTTP layer only reads and
//! flips read flags.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::model::notification::{Notification, NotificationKind, RelatedKind};
use crate::model::role::Role;
use crate::store::{Store, StoreResult};
use crate::workflow::{DomainEvent, EventBus};

use crate::model::leave_request::LeaveStatus;

pub struct NotificationDispatcher {
    store: Arc<Store>,
}

impl NotificationDispatcher {
    /// Wires a dispatcher into the event bus. Events are handled on the
    /// publishing thread, so inbox entries exist before the triggering
    /// request returns.
    pub fn attach(store: Arc<Store>, bus: &EventBus) {
        let dispatcher = NotificationDispatcher { store };
        bus.subscribe(move |event| dispatcher.handle(event));
    }

    fn handle(&self, event: &DomainEvent) {
        let result = match event {
            DomainEvent::LeaveApplied(leave) => self.notify_admins(
                format!("{} applied for {}.", leave.user_name, leave.leave_type),
                NotificationKind::Info,
                Some((leave.id.clone(), RelatedKind::Leave)),
            ),
            DomainEvent::LeaveDecided(leave) => self.notify_one(
                &leave.user_id,
                format!("Your leave was {}.", leave.status),
                decision_kind(leave.status),
                None,
            ),
            DomainEvent::ClaimSubmitted(claim) => self.notify_admins(
                format!("{} submitted a claim.", claim.user_name),
                NotificationKind::Info,
                Some((claim.id.clone(), RelatedKind::Claim)),
            ),
            DomainEvent::ClaimDecided(claim) => self.notify_one(
                &claim.user_id,
                format!("Your claim was {}.", claim.status),
                decision_kind(claim.status),
                None,
            ),
            DomainEvent::BalanceAdjusted {
                user_id,
                admin_name,
                kind,
                amount,
            } => self.notify_one(
                user_id,
                format!(
                    "Admin {} adjusted your {} by {}{}.",
                    admin_name,
                    kind,
                    if *amount > 0.0 { "+" } else { "" },
                    amount
                ),
                NotificationKind::Info,
                None,
            ),
        };

        // Notification delivery is best effort: a failed persist must not
        // fail the workflow transition that already committed.
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist notifications for event");
        }
    }

    fn notify_one(
        &self,
        user_id: &str,
        message: String,
        kind: NotificationKind,
        related: Option<(String, RelatedKind)>,
    ) -> StoreResult<()> {
        let note = build(user_id, message, kind, related);
        self.store.mutate(|s| s.notifications.push(note))
    }

    /// One inbox entry per admin account.
    fn notify_admins(
        &self,
        message: String,
        kind: NotificationKind,
        related: Option<(String, RelatedKind)>,
    ) -> StoreResult<()> {
        self.store.mutate(|s| {
            let admin_ids: Vec<String> = s
                .users
                .iter()
                .filter(|u| u.role == Role::Admin)
                .map(|u| u.id.clone())
                .collect();
            for id in admin_ids {
                s.notifications
                    .push(build(&id, message.clone(), kind, related.clone()));
            }
        })
    }
}

fn decision_kind(status: LeaveStatus) -> NotificationKind {
    if status == LeaveStatus::Approved {
        NotificationKind::Success
    } else {
        NotificationKind::Alert
    }
}

fn build(
    user_id: &str,
    message: String,
    kind: NotificationKind,
    related: Option<(String, RelatedKind)>,
) -> Notification {
    let (related_id, related_kind) = match related {
        Some((id, kind)) => (Some(id), Some(kind)),
        None => (None, None),
    };
    Notification {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        message,
        timestamp: Utc::now(),
        is_read: false,
        kind,
        related_id,
        related_kind,
    }
}

/// One user's inbox, newest first.
pub fn user_notifications(store: &Store, user_id: &str) -> Vec<Notification> {
    store.read(|s| {
        let mut out: Vec<_> = s
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    })
}

pub fn notification_by_id(store: &Store, id: &str) -> Option<Notification> {
    store.read(|s| s.notifications.iter().find(|n| n.id == id).cloned())
}

/// Flips one notification's read flag. Returns `false` when the id is
/// unknown or the notification belongs to someone else, so other users'
/// entries are indistinguishable from missing ones.
pub fn mark_read(store: &Store, user_id: &str, id: &str) -> StoreResult<bool> {
    store.mutate(|s| {
        match s
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(note) => {
                note.is_read = true;
                true
            }
            None => false,
        }
    })
}

/// Marks every notification owned by `user_id` read, returning how many
/// were flipped.
pub fn mark_all_read(store: &Store, user_id: &str) -> StoreResult<usize> {
    store.mutate(|s| {
        let mut flipped = 0;
        for note in s.notifications.iter_mut().filter(|n| n.user_id == user_id) {
            if !note.is_read {
                note.is_read = true;
                flipped += 1;
            }
        }
        flipped
    })
}
