//! Interactive dashboard session (`rscs browse`).
//!
//! Reads one command per line and re-renders the dashboard after each:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `sort <field>` | Header click on `name`, `total_words`, `avg_rscs`, `lsa_counts` |
//! | `expand <id>` | Toggle a parent row |
//! | `collapse` | Collapse every row |
//! | `title <n>` / `title all` | Change the title filter and refetch |
//! | `checksum on` / `checksum off` | Toggle checksums and refetch |
//! | `info header` / `info nav` / `info card` | Activate an explainer trigger |
//! | `esc` | Escape key |
//! | `close` | Close the explainer |
//! | `refresh` | Refetch with the current filters |
//! | `help` | List commands |
//! | `quit` | End the session |
//!
//! Every handler runs to completion before the next line is read, so no two
//! state transitions ever overlap.

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::AgencySource;
use crate::dashboard::Dashboard;
use crate::explainer::{ControlId, FocusHost, Key, Trigger};
use crate::models::EntityId;
use crate::render;
use crate::sort::SortField;

const HELP: &str = "Commands: sort <field>, expand <id>, collapse, title <n|all>, \
checksum on|off, info header|nav|card, esc, close, refresh, help, quit\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sort(SortField),
    Expand(EntityId),
    Collapse,
    Title(Option<u32>),
    Checksum(bool),
    Info(Trigger),
    Escape,
    Close,
    Refresh,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: '{}'", line.trim()));
        }

        let need = |what: &str| format!("'{}' needs {}", verb, what);
        match (verb, arg) {
            ("sort", Some(field)) => field.parse().map(Command::Sort),
            ("sort", None) => Err(need("a field")),
            ("expand", Some(id)) => id.parse().map(Command::Expand),
            ("expand", None) => Err(need("an id")),
            ("collapse", None) => Ok(Command::Collapse),
            ("title", Some("all")) => Ok(Command::Title(None)),
            ("title", Some(n)) => n
                .parse()
                .map(|t| Command::Title(Some(t)))
                .map_err(|_| format!("invalid title number: '{}'", n)),
            ("title", None) => Err(need("a number or 'all'")),
            ("checksum", Some("on")) => Ok(Command::Checksum(true)),
            ("checksum", Some("off")) => Ok(Command::Checksum(false)),
            ("checksum", _) => Err(need("'on' or 'off'")),
            ("info", Some(trigger)) => trigger.parse().map(Command::Info),
            ("info", None) => Err(need("header, nav, or card")),
            ("esc", None) => Ok(Command::Escape),
            ("close", None) => Ok(Command::Close),
            ("refresh", None) => Ok(Command::Refresh),
            ("help", None) => Ok(Command::Help),
            ("quit" | "exit", None) => Ok(Command::Quit),
            _ => Err(format!("unknown command: '{}'", line.trim())),
        }
    }
}

/// Focus bookkeeping for a line-driven terminal: the "focused control" is
/// the last trigger the user activated or focus was returned to.
#[derive(Debug, Default)]
pub struct TerminalFocus {
    active: Option<ControlId>,
}

impl FocusHost for TerminalFocus {
    fn active_control(&self) -> Option<ControlId> {
        self.active.clone()
    }

    fn focus(&mut self, control: &ControlId) {
        self.active = Some(control.clone());
    }
}

/// Run a session until `quit` or end of input.
pub async fn run_session<R, W>(
    dashboard: &mut Dashboard,
    source: &dyn AgencySource,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut focus = TerminalFocus::default();
    dashboard.refresh(source).await;
    render_pass(dashboard, &mut focus, out)?;

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "{}", e)?;
                write!(out, "{}", HELP)?;
                continue;
            }
        };
        tracing::debug!(?command, "browse command");

        match command {
            Command::Quit => break,
            Command::Help => {
                write!(out, "{}", HELP)?;
                continue;
            }
            Command::Sort(field) => dashboard.set_sort_key(field),
            Command::Expand(id) => {
                dashboard.toggle_expanded(id);
            }
            Command::Collapse => dashboard.collapse_all(),
            Command::Title(title) => {
                if dashboard.set_title_filter(title) {
                    dashboard.refresh(source).await;
                }
            }
            Command::Checksum(on) => {
                if dashboard.set_include_checksum(on) {
                    dashboard.refresh(source).await;
                }
            }
            Command::Info(trigger) => {
                // Activating a control focuses it first.
                focus.focus(&trigger.control());
                dashboard.activate_trigger(trigger, &focus);
            }
            Command::Escape => {
                dashboard.explainer().handle_key(Key::Escape);
            }
            Command::Close => dashboard.explainer().close(),
            Command::Refresh => {
                dashboard.refresh(source).await;
            }
        }
        render_pass(dashboard, &mut focus, out)?;
    }
    Ok(())
}

/// Render, then run post-render work (deferred focus return).
fn render_pass<W: Write>(
    dashboard: &Dashboard,
    focus: &mut TerminalFocus,
    out: &mut W,
) -> Result<()> {
    write!(out, "{}", render::render_dashboard(dashboard))?;
    if let Some(control) = dashboard.explainer().after_render(focus) {
        writeln!(out, "(focus returned to {})", control)?;
    }
    writeln!(out)?;
    Ok(())
}
