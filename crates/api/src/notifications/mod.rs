//! Notification fan-out.
//!
//! Mutating handlers call [`notify`] explicitly with a
//! [`NotificationDraft`]. The notification row is stored first; if SMTP is
//! configured and the recipient wants email, a copy is sent from a detached
//! task so mail latency never holds up the response.

use std::sync::Arc;

use collabspace_core::notification::NotificationDraft;
use collabspace_db::models::notification::Notification;
use collabspace_db::repositories::{NotificationRepo, UserRepo};
use collabspace_events::{EmailDelivery, OutgoingEmail};

use crate::error::AppResult;
use crate::state::AppState;

/// Store a notification and send the email copy when wanted.
pub async fn notify(state: &AppState, draft: NotificationDraft) -> AppResult<Notification> {
    let notification = NotificationRepo::create(&state.pool, &draft).await?;
    tracing::debug!(
        notification_id = notification.id,
        recipient_id = draft.recipient_id,
        kind = %draft.kind,
        "Notification stored",
    );

    if let Some(mailer) = &state.mailer {
        send_email(state, Arc::clone(mailer), &draft).await;
    }

    Ok(notification)
}

/// Store several notifications in order, stopping at the first failure.
pub async fn notify_all(
    state: &AppState,
    drafts: impl IntoIterator<Item = NotificationDraft>,
) -> AppResult<()> {
    for draft in drafts {
        notify(state, draft).await?;
    }
    Ok(())
}

async fn send_email(state: &AppState, mailer: Arc<EmailDelivery>, draft: &NotificationDraft) {
    let recipient = match UserRepo::find_by_id(&state.pool, draft.recipient_id).await {
        Ok(Some(user)) if user.wants_email() => user,
        Ok(_) => return,
        Err(e) => {
            tracing::warn!(
                error = %e,
                recipient_id = draft.recipient_id,
                "Could not load notification recipient for email",
            );
            return;
        }
    };

    let email =
        OutgoingEmail::for_notification(&recipient.email, draft, &state.config.frontend_url);
    let recipient_id = recipient.id;
    tokio::spawn(async move {
        if let Err(e) = mailer.deliver(&email).await {
            tracing::warn!(error = %e, recipient_id, "Notification email failed");
        }
    });
}
