use anyhow::{Context, Result};
use console::{style, Term};
use std::io::BufRead;

use crate::pipeline::Action;
use crate::presentation::UiEvent;
use crate::ui::output::status_line;

/// Line-based terminal surface for the gate
#[derive(Clone)]
pub struct Terminal {
    term: Term,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Read one line without blocking the runtime's worker threads.
    /// None once stdin is closed.
    pub async fn prompt(&self, label: &str) -> Result<Option<String>> {
        let term = self.term.clone();
        let label = label.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<String>> {
            term.write_str(&format!("{} ", style(label).magenta().bold()))?;
            // Term::read_line reports EOF as an empty line
            Ok(read_answer(&mut std::io::stdin().lock())?)
        })
        .await
        .context("input task failed")?
    }

    /// Closed input counts as "no"
    pub async fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N]")).await?;
        Ok(answer.is_some_and(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes")))
    }

    pub fn render(&self, event: &UiEvent) {
        match event {
            UiEvent::Status { message, tone } => {
                let _ = self.term.write_line(&status_line(message, *tone));
            }
            UiEvent::Transition => {
                let _ = self.term.clear_screen();
                let _ = self
                    .term
                    .write_line(&style("── MENU ──").magenta().bold().to_string());
            }
            UiEvent::Quit => {}
        }
    }

    pub fn show_menu(&self, actions: &[Action]) {
        for (i, action) in actions.iter().enumerate() {
            let _ = self
                .term
                .write_line(&format!("  {} {}", style(i + 1).magenta(), action.label));
        }
        let _ = self.term.write_line(&format!("  {} quit", style("q").magenta()));
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

/// One line without its terminator, or None at end of input
fn read_answer(reader: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_answer_strips_line_ending() {
        let mut input = Cursor::new("KEY-123\r\n2\n");
        assert_eq!(read_answer(&mut input).unwrap().as_deref(), Some("KEY-123"));
        assert_eq!(read_answer(&mut input).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_line_is_not_end_of_input() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_answer(&mut input).unwrap().as_deref(), Some(""));
        assert_eq!(read_answer(&mut input).unwrap(), None);
    }

    #[test]
    fn test_closed_input_stays_closed() {
        let mut input = Cursor::new("");
        assert_eq!(read_answer(&mut input).unwrap(), None);
        assert_eq!(read_answer(&mut input).unwrap(), None);
    }
}
