//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ConsoleError`] via `From` when crossing a port boundary.

/// Base error for every port and use-case in the console.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Input rejected by a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A user-initiated action was refused or could not reach the server.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The monitor endpoint could not be reached or answered garbage.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Cookie persistence failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The status monitor task is gone; commands can no longer be delivered.
    #[error("status monitor is not running")]
    MonitorStopped,
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Action name not known to the manage page.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The server does not currently allow this action.
    #[error("action not allowed right now: {0}")]
    ActionNotAllowed(String),

    /// Status color outside of green/yellow/red.
    #[error("unknown status color: {0}")]
    UnknownColor(String),

    /// Filter selectors are addressed by a non-empty name.
    #[error("filter name must not be empty")]
    EmptyFilterName,

    /// Pages are numbered from 1.
    #[error("page number must be at least 1")]
    ZeroPage,
}

/// Failure of a user-initiated POST (save, test, restore, start, …).
///
/// Rendered the way the console alerts the user: the URL, the HTTP status
/// (when one was received) and the error text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{url}: {} ({message})", display_status(.status))]
pub struct ActionError {
    /// Full URL the request was sent to.
    pub url: String,
    /// HTTP status, `None` when no response was received.
    pub status: Option<u16>,
    /// Server-provided or transport error text.
    pub message: String,
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "0".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_url_status_and_text_in_action_error() {
        let err = ActionError {
            url: "http://localhost/rest/manage".to_string(),
            status: Some(500),
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/rest/manage: 500 (Internal Server Error)"
        );
    }

    #[test]
    fn should_render_zero_status_when_no_response_received() {
        let err = ActionError {
            url: "http://localhost/rest/backup".to_string(),
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/rest/backup: 0 (connection refused)"
        );
    }

    #[test]
    fn should_convert_validation_error_into_console_error() {
        let err: ConsoleError = ValidationError::ZeroPage.into();
        assert!(matches!(err, ConsoleError::Validation(ValidationError::ZeroPage)));
    }

    #[test]
    fn should_keep_action_error_display_when_wrapped() {
        let err: ConsoleError = ActionError {
            url: "/open/setup".to_string(),
            status: Some(404),
            message: "Not Found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "/open/setup: 404 (Not Found)");
    }
}
