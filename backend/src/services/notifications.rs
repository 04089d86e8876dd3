use crate::{
    models::{
        employee::Employee,
        notification::{Notification, NotificationKind},
    },
    state::AppState,
};

/// Sends a notification to the account linked to `employee`, if there is one.
///
/// Delivery failures are logged and swallowed so the triggering operation still succeeds.
pub async fn notify_employee(
    state: &AppState,
    employee: &Employee,
    title: &str,
    message: String,
    kind: NotificationKind,
) {
    let Some(user_id) = employee.user_id.clone() else {
        tracing::debug!(employee_id = %employee.id, "Employee has no linked user; skipping notification");
        return;
    };

    let notification = Notification::new(user_id, title.to_string(), message, kind);
    if let Err(err) = state.collection::<Notification>().insert(&notification).await {
        tracing::warn!(
            employee_id = %employee.id,
            error = %err,
            "Failed to store notification"
        );
    }
}
