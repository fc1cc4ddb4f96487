//! Line-oriented journal shell.
//!
//! Each input line maps to one [`ShellCommand`], which in turn maps to one
//! journal operation. Reading stdin happens on a blocking task so the
//! runtime stays free for the fetches and saves in flight.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use tracing::debug;

use crate::constants::DATE_FORMAT_ISO;
use crate::errors::AppResult;
use crate::journal::date_key;
use crate::prompt::Interaction;
use crate::session::{Journal, SessionState, SwitchOutcome};

const HELP: &str = "\
Commands:
  date YYYY-MM-DD   open the entry for a day
  today             open today's entry
  text <words>      replace the journal text
  feeling <words>   set the feeling
  weather <words>   set the weather
  save              save today's edits
  show              print the current entry
  help              show this help
  quit              leave the journal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Date(NaiveDate),
    Today,
    Text(String),
    Feeling(String),
    Weather(String),
    Save,
    Show,
    Help,
    Quit,
}

/// Parses one input line.
///
/// # Errors
///
/// Returns a message suitable for printing when the line is not understood.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "date" => NaiveDate::parse_from_str(rest, DATE_FORMAT_ISO)
            .map(ShellCommand::Date)
            .map_err(|_| format!("Invalid date format: '{}' (expected YYYY-MM-DD)", rest)),
        "today" => Ok(ShellCommand::Today),
        "text" => Ok(ShellCommand::Text(rest.to_string())),
        "feeling" if !rest.is_empty() => Ok(ShellCommand::Feeling(rest.to_string())),
        "weather" if !rest.is_empty() => Ok(ShellCommand::Weather(rest.to_string())),
        "feeling" | "weather" => Err(format!("'{}' needs a value", word)),
        "save" => Ok(ShellCommand::Save),
        "show" => Ok(ShellCommand::Show),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

/// Renders a snapshot for the terminal.
pub fn render(state: &SessionState) -> String {
    let mut out = format!("[{}] {}\n", date_key(state.current_date), state.status);
    match &state.current_entry {
        Some(entry) => {
            out.push_str(&format!("  location: {}\n", entry.location_or_unknown()));
            out.push_str(&format!(
                "  feeling:  {}\n",
                entry.feeling.as_deref().unwrap_or("-")
            ));
            out.push_str(&format!(
                "  weather:  {}\n",
                entry.weather.as_deref().unwrap_or("-")
            ));
            out.push_str(&format!("  {}\n", entry.body.as_deref().unwrap_or("")));
        }
        None => out.push_str("  (no entry)\n"),
    }
    if state.edited {
        out.push_str("  * unsaved changes\n");
    }
    out
}

async fn read_line() -> AppResult<Option<String>> {
    let line = tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    })
    .await
    .map_err(io::Error::other)??;
    Ok(line)
}

/// Runs the shell until `quit` or end of input.
pub async fn run<I: Interaction>(journal: &Journal<I>) -> AppResult<()> {
    println!("{}", render(&journal.snapshot()));
    println!("Type 'help' for commands.");

    while let Some(line) = read_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    eprintln!("{}", message);
                }
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            ShellCommand::Date(date) => switch(journal, date).await,
            ShellCommand::Today => switch(journal, journal.sync().today()).await,
            ShellCommand::Text(body) => journal.update_text(body),
            ShellCommand::Feeling(feeling) => journal.update_feeling(feeling),
            ShellCommand::Weather(weather) => journal.update_weather(weather),
            ShellCommand::Save => {
                let _ = journal.manually_save().await;
            }
            ShellCommand::Show => {}
            ShellCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ShellCommand::Quit => break,
        }

        println!("{}", render(&journal.snapshot()));
    }

    Ok(())
}

async fn switch<I: Interaction>(journal: &Journal<I>, date: NaiveDate) {
    // failures and rejections are reported through Interaction
    if let Ok(SwitchOutcome::NotReady) = journal.switch_date(date).await {
        eprintln!("Not authenticated yet.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::JournalEntry;

    #[test]
    fn test_parse_date_command() {
        assert_eq!(
            parse_command("date 2026-10-03"),
            Ok(ShellCommand::Date(NaiveDate::from_ymd_opt(2026, 10, 3).unwrap()))
        );
        assert!(parse_command("date 03/10/2026")
            .unwrap_err()
            .contains("Invalid date format"));
    }

    #[test]
    fn test_parse_text_keeps_spacing_inside() {
        assert_eq!(
            parse_command("text went for a  long walk\n"),
            Ok(ShellCommand::Text("went for a  long walk".to_string()))
        );
        assert_eq!(parse_command("text"), Ok(ShellCommand::Text(String::new())));
    }

    #[test]
    fn test_parse_fields_require_value() {
        assert_eq!(
            parse_command("feeling calm"),
            Ok(ShellCommand::Feeling("calm".to_string()))
        );
        assert!(parse_command("weather").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("save"), Ok(ShellCommand::Save));
        assert_eq!(parse_command("  today  "), Ok(ShellCommand::Today));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_command(""), Err(String::new()));
        assert!(parse_command("dance").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_render_marks_unsaved() {
        let mut state = SessionState::initial(
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
            Some(JournalEntry::placeholder("Here")),
        );
        state.edited = true;

        let rendered = render(&state);
        assert!(rendered.starts_with("[Wed Oct 14 2026]"));
        assert!(rendered.contains("location: Here"));
        assert!(rendered.contains("unsaved changes"));
    }
}
