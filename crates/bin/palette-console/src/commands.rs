//! Parsing of the interactive commands typed on stdin.

use anyhow::{Context, bail};

use palette_domain::action::ManageAction;

/// Usage text printed by `h`.
pub const HELP: &str = "\
n            next page
p            previous page
f            first page
l            last page
g <page>     go to page
s <name> <id> select filter option (id 0 clears the filter)
r            refresh now
a <action>   post a manage action (start, stop, backup, restart, repair-license, ziplogs)
a restore <file> restore a backup
h            this help
q            quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    GoToPage(u32),
    SelectFilter { name: String, value: String },
    Refresh,
    /// `filename` is only set (and required) for [`ManageAction::Restore`].
    Action {
        action: ManageAction,
        filename: Option<String>,
    },
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`.
///
/// # Errors
///
/// Fails on unknown commands and on missing or malformed arguments.
pub fn parse(line: &str) -> anyhow::Result<Option<ConsoleCommand>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let parsed = match command {
        "n" | "next" => ConsoleCommand::NextPage,
        "p" | "prev" => ConsoleCommand::PreviousPage,
        "f" | "first" => ConsoleCommand::FirstPage,
        "l" | "last" => ConsoleCommand::LastPage,
        "g" | "go" => {
            let page = words.next().context("missing page number")?;
            let page = page
                .parse()
                .with_context(|| format!("invalid page number: {page}"))?;
            ConsoleCommand::GoToPage(page)
        }
        "s" | "select" => {
            let name = words.next().context("missing filter name")?;
            let value = words.next().context("missing filter option id")?;
            ConsoleCommand::SelectFilter {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        "r" | "refresh" => ConsoleCommand::Refresh,
        "a" | "action" => {
            let name = words.next().context("missing action name")?;
            let action: ManageAction = name.parse()?;
            let filename = if action == ManageAction::Restore {
                let file = words.next().context("missing backup file name")?;
                Some(file.to_string())
            } else {
                None
            };
            ConsoleCommand::Action { action, filename }
        }
        "h" | "help" | "?" => ConsoleCommand::Help,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command: {other} (type h for help)"),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected argument: {extra}");
    }
    Ok(Some(parsed))
}
