//! Interactive console: stdin lines become page actions

use crate::page::{Action, Page, Tab};
use crate::render::{Theme, format_page};
use chrono::Utc;
use std::str::FromStr;
use ticketdesk_core::{Error, Result, TicketId, TicketStatus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Console help text
pub const HELP: &str = "\
Form:
  title <text>                  set the title
  desc <text>                   set the description
  category <value>              billing | technical | account | general
  priority <value>              low | medium | high | critical
  classify                      ask the AI for category and priority
  submit                        create the ticket
List:
  search <text>                 search title and description (debounced)
  filter <field> <value|all>    field: category | priority | status
  clear                         drop every filter and the search
  status <id> <status>          open | in_progress | resolved | closed
Other:
  tab <tickets|dashboard>       switch tabs
  show                          redraw
  help                          this text
  quit                          leave";

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the page
    Action(Action),
    /// Redraw
    Show,
    /// Print help
    Help,
    /// Leave the console
    Quit,
    /// Blank line
    Nothing,
}

fn parse_filter<T: FromStr<Err = Error>>(value: &str) -> Result<Option<T>> {
    if value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::validation("command", format!("usage: {usage}")))
    } else {
        Ok(value)
    }
}

/// Parse one line of input
///
/// # Errors
///
/// Returns a validation error for unknown commands, missing arguments and
/// values that are not valid categories, priorities, statuses or ids.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let action = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Nothing),
        "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        "title" => Action::SetTitle(rest.to_string()),
        "desc" | "description" => Action::SetDescription(rest.to_string()),
        "category" => Action::SetCategory(required(rest, "category <value>")?.parse()?),
        "priority" => Action::SetPriority(required(rest, "priority <value>")?.parse()?),
        "classify" => Action::Classify,
        "submit" => Action::Submit,
        "search" => Action::Search(rest.to_string()),
        "clear" => Action::ClearFilters,
        "filter" => {
            let usage = "filter <category|priority|status> <value|all>";
            let (field, value) = required(rest, usage)?
                .split_once(char::is_whitespace)
                .ok_or_else(|| Error::validation("command", format!("usage: {usage}")))?;
            let value = value.trim();
            match field.to_ascii_lowercase().as_str() {
                "category" => Action::FilterCategory(parse_filter(value)?),
                "priority" => Action::FilterPriority(parse_filter(value)?),
                "status" => Action::FilterStatus(parse_filter(value)?),
                other => {
                    return Err(Error::validation(
                        "filter",
                        format!("unknown filter '{other}' (expected category, priority or status)"),
                    ));
                }
            }
        }
        "status" => {
            let usage = "status <id> <status>";
            let (id, status) = required(rest, usage)?
                .split_once(char::is_whitespace)
                .ok_or_else(|| Error::validation("command", format!("usage: {usage}")))?;
            let id: TicketId = id
                .trim_start_matches('#')
                .parse()
                .map_err(|_| Error::validation("id", format!("'{id}' is not a ticket id")))?;
            Action::ChangeStatus {
                id,
                status: status.parse::<TicketStatus>()?,
            }
        }
        "tab" => match required(rest, "tab <tickets|dashboard>")?.to_ascii_lowercase().as_str() {
            "tickets" => Action::ShowTab(Tab::Tickets),
            "dashboard" | "stats" => Action::ShowTab(Tab::Dashboard),
            other => {
                return Err(Error::validation(
                    "tab",
                    format!("unknown tab '{other}' (expected tickets or dashboard)"),
                ));
            }
        },
        other => {
            return Err(Error::validation(
                "command",
                format!("unknown command '{other}', type 'help'"),
            ));
        }
    };

    Ok(Command::Action(action))
}

async fn draw<W: AsyncWrite + Unpin + Send>(out: &mut W, page: &Page, theme: Theme) -> Result<()> {
    let screen = format_page(page, theme, Utc::now());
    out.write_all(format!("\n{screen}\n> ").as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Run the console until `quit` or end of input
///
/// Input and request completions are processed as they come; the page is
/// redrawn after each change. Requests still in flight on exit are awaited
/// so a submitted ticket is never dropped.
///
/// # Errors
///
/// Returns an error only when reading input or writing output fails.
pub async fn run<R, W>(page: &mut Page, input: R, out: &mut W, theme: Theme) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = input.lines();
    page.mount();
    draw(out, page, theme).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Nothing) => {}
                    Ok(Command::Help) => out.write_all(format!("{HELP}\n").as_bytes()).await?,
                    Ok(Command::Show) => draw(out, page, theme).await?,
                    Ok(Command::Action(action)) => {
                        debug!(?action, "console action");
                        match page.dispatch(action) {
                            Ok(()) => draw(out, page, theme).await?,
                            Err(e) => out.write_all(format!("{e}\n> ").as_bytes()).await?,
                        }
                    }
                    Err(e) => out.write_all(format!("{e}\n> ").as_bytes()).await?,
                }
                out.flush().await?;
            }
            progressed = page.step(), if !page.is_idle() => {
                if progressed {
                    draw(out, page, theme).await?;
                }
            }
        }
    }

    page.settle().await;
    Ok(())
}
