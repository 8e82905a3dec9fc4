//! Submission of manage actions, gated by the last `state` payload.

use tokio::sync::watch;

use palette_app::ports::ActionClient;
use palette_app::services::action_gate::ActionGate;
use palette_domain::action::ManageAction;
use palette_domain::error::{ConsoleError, ValidationError};

/// Posts manage actions the server currently allows.
///
/// After a successful submission every action stays disabled until the
/// next state payload arrives. A failed submission unlocks the actions
/// that were enabled before it.
pub struct ActionSubmitter<A> {
    client: A,
    updates: watch::Receiver<ActionGate>,
    gate: ActionGate,
}

impl<A: ActionClient> ActionSubmitter<A> {
    pub fn new(client: A, updates: watch::Receiver<ActionGate>) -> Self {
        let gate = updates.borrow().clone();
        Self {
            client,
            updates,
            gate,
        }
    }

    /// Gate as of the latest state payload (or the local submission lock).
    pub fn gate(&mut self) -> &ActionGate {
        if self.updates.has_changed().unwrap_or(false) {
            self.gate = self.updates.borrow_and_update().clone();
        }
        &self.gate
    }

    /// Post `action`, with the backup file name for restores.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ActionNotAllowed`] when the server does
    /// not allow the action right now, or [`ConsoleError::Action`] when the
    /// request fails.
    pub async fn submit(
        &mut self,
        action: ManageAction,
        filename: Option<&str>,
    ) -> Result<serde_json::Value, ConsoleError> {
        if !self.gate().is_enabled(action) {
            return Err(ValidationError::ActionNotAllowed(action.to_string()).into());
        }
        let previous = self.gate.clone();
        self.gate.disable_all();

        let mut form = action.form();
        if let Some(filename) = filename {
            form.push(("filename".to_string(), filename.to_string()));
        }
        tracing::debug!(%action, "submitting action");
        let result = self.client.post_action(action.endpoint(), &form).await;
        if let Err(err) = &result {
            tracing::warn!(%action, %err, "action failed, unlocking actions");
            self.gate = previous;
        }
        result
    }
}
