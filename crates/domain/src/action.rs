//! Server actions offered by the manage page.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Endpoint of start/stop/restart/license/log actions.
pub const MANAGE_ENDPOINT: &str = "/rest/manage";

/// Endpoint of backup and restore actions.
pub const BACKUP_ENDPOINT: &str = "/rest/backup";

/// An action the user can trigger once the server allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ManageAction {
    Start,
    Stop,
    Backup,
    Restart,
    RepairLicense,
    Ziplogs,
    Restore,
}

impl ManageAction {
    /// Every action, in display order.
    pub const ALL: [Self; 7] = [
        Self::Start,
        Self::Stop,
        Self::Backup,
        Self::Restart,
        Self::RepairLicense,
        Self::Ziplogs,
        Self::Restore,
    ];

    /// Name used in `allowable-actions` and in the `action` form field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Backup => "backup",
            Self::Restart => "restart",
            Self::RepairLicense => "repair-license",
            Self::Ziplogs => "ziplogs",
            Self::Restore => "restore",
        }
    }

    /// REST endpoint the action is posted to.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Backup | Self::Restore => BACKUP_ENDPOINT,
            _ => MANAGE_ENDPOINT,
        }
    }

    /// Form body of the action request.
    #[must_use]
    pub fn form(self) -> Vec<(String, String)> {
        vec![("action".to_string(), self.name().to_string())]
    }
}

impl fmt::Display for ManageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManageAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| ValidationError::UnknownAction(s.to_string()))
    }
}
