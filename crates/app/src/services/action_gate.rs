//! Action gate: which manage actions the server currently accepts.
//!
//! Every accepted status payload carries `allowable-actions` and
//! `connected`; the gate mirrors them so the console can refuse an action
//! before posting it.

use std::collections::BTreeSet;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use palette_domain::action::ManageAction;
use palette_domain::payload::MonitorPayload;

/// Enabled actions as of the last state payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionGate {
    allowed: BTreeSet<ManageAction>,
    connected: bool,
}

impl ActionGate {
    /// Replace the gate with the actions allowed by `payload`.
    ///
    /// A payload without `allowable-actions` (e.g. while disconnected)
    /// disables everything. Unknown action names are skipped.
    pub fn apply_state(&mut self, payload: &MonitorPayload) {
        self.allowed = payload
            .allowable_actions
            .iter()
            .flatten()
            .filter_map(|name| match name.parse::<ManageAction>() {
                Ok(action) => Some(action),
                Err(err) => {
                    tracing::debug!(%err, "ignoring allowable action");
                    None
                }
            })
            .collect();
        self.connected = payload.connected.unwrap_or(false);
    }

    #[must_use]
    pub fn is_enabled(&self, action: ManageAction) -> bool {
        self.allowed.contains(&action)
    }

    /// Whether the server reported a connected agent.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Enabled actions in display order.
    #[must_use]
    pub fn enabled(&self) -> Vec<ManageAction> {
        ManageAction::ALL
            .into_iter()
            .filter(|action| self.is_enabled(*action))
            .collect()
    }

    /// Disable every action until the next state payload (used while an
    /// action is being submitted).
    pub fn disable_all(&mut self) {
        self.allowed.clear();
    }

    /// Follow the `state` channel, publishing the gate on a watch channel.
    ///
    /// The task ends when the state stream ends or every watch receiver
    /// is gone.
    pub fn watch(
        mut states: impl Stream<Item = MonitorPayload> + Send + Unpin + 'static,
    ) -> (watch::Receiver<ActionGate>, JoinHandle<()>) {
        let (sender, receiver) = watch::channel(ActionGate::default());
        let task = tokio::spawn(async move {
            while let Some(payload) = states.next().await {
                let mut gate = sender.borrow().clone();
                gate.apply_state(&payload);
                if sender.send(gate).is_err() {
                    break;
                }
            }
            tracing::debug!("action gate stopped");
        });
        (receiver, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::event_bus::InProcessStateBus;
    use crate::ports::StatePublisher;

    fn state(actions: &[&str], connected: bool) -> MonitorPayload {
        MonitorPayload {
            allowable_actions: Some(actions.iter().map(ToString::to_string).collect()),
            connected: Some(connected),
            ..MonitorPayload::default()
        }
    }

    #[test]
    fn should_enable_only_allowed_actions() {
        let mut gate = ActionGate::default();
        gate.apply_state(&state(&["stop", "backup"], true));

        assert!(gate.is_enabled(ManageAction::Stop));
        assert!(gate.is_enabled(ManageAction::Backup));
        assert!(!gate.is_enabled(ManageAction::Start));
        assert!(gate.is_connected());
    }

    #[test]
    fn should_disable_everything_when_actions_missing() {
        let mut gate = ActionGate::default();
        gate.apply_state(&state(&["start"], true));
        gate.apply_state(&MonitorPayload::disconnected());

        assert!(gate.enabled().is_empty());
        assert!(!gate.is_connected());
    }

    #[test]
    fn should_skip_unknown_action_names() {
        let mut gate = ActionGate::default();
        gate.apply_state(&state(&["explode", "repair-license"], false));
        assert_eq!(gate.enabled(), vec![ManageAction::RepairLicense]);
    }

    #[test]
    fn should_list_enabled_actions_in_display_order() {
        let mut gate = ActionGate::default();
        gate.apply_state(&state(&["restore", "start", "ziplogs"], true));
        assert_eq!(
            gate.enabled(),
            vec![
                ManageAction::Start,
                ManageAction::Ziplogs,
                ManageAction::Restore
            ]
        );
    }

    #[test]
    fn should_disable_all_while_submitting() {
        let mut gate = ActionGate::default();
        gate.apply_state(&state(&["start", "stop"], true));
        gate.disable_all();
        assert!(!gate.is_enabled(ManageAction::Start));
        assert!(gate.is_connected());
    }

    #[tokio::test]
    async fn should_follow_state_channel() {
        let bus = InProcessStateBus::new(8);
        let (mut gate, task) = ActionGate::watch(bus.updates());

        bus.publish(state(&["start"], true)).await.unwrap();
        gate.changed().await.unwrap();
        assert!(gate.borrow().is_enabled(ManageAction::Start));

        drop(bus);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn should_pick_up_state_published_before_watching() {
        let bus = InProcessStateBus::new(8);
        bus.publish(state(&["backup"], true)).await.unwrap();

        let (mut gate, _task) = ActionGate::watch(bus.updates());

        gate.changed().await.unwrap();
        assert!(gate.borrow().is_enabled(ManageAction::Backup));
    }
}
