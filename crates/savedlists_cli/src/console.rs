//! Line-oriented prompter for terminals.
//!
//! # Invariants
//! - Choices are shown 1-based; an empty line or end of input dismisses.
//! - Text prompts show the pre-filled value; an empty line submits it.
//! - I/O failures count as dismissal.

use log::warn;
use savedlists_core::{ChoicePrompt, ListPrompter, Notice, TextPrompt};
use std::io::{self, BufRead, Write};

pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next input line without its line ending; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn try_choose(&mut self, prompt: &ChoicePrompt<'_>) -> io::Result<Option<usize>> {
        writeln!(self.output, "{}", prompt.title)?;
        for (position, option) in prompt.options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", position + 1)?;
        }

        loop {
            write!(
                self.output,
                "Select 1-{} (empty to cancel): ",
                prompt.options.len()
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(number) if (1..=prompt.options.len()).contains(&number) => {
                    return Ok(Some(number - 1));
                }
                _ => writeln!(self.output, "Not a valid choice: {answer}")?,
            }
        }
    }

    fn try_input_text(&mut self, prompt: &TextPrompt<'_>) -> io::Result<Option<String>> {
        if prompt.initial.is_empty() {
            write!(self.output, "{}: ", prompt.title)?;
        } else {
            write!(self.output, "{} [{}]: ", prompt.title, prompt.initial)?;
        }
        self.output.flush()?;

        Ok(self.read_line()?.map(|line| {
            if line.is_empty() {
                prompt.initial.to_string()
            } else {
                line
            }
        }))
    }
}

impl<R: BufRead, W: Write> ListPrompter for ConsolePrompter<R, W> {
    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Option<usize> {
        self.try_choose(prompt).unwrap_or_else(|err| {
            warn!("event=prompt_choose module=cli status=error error={err}");
            None
        })
    }

    fn input_text(&mut self, prompt: &TextPrompt<'_>) -> Option<String> {
        self.try_input_text(prompt).unwrap_or_else(|err| {
            warn!("event=prompt_input module=cli status=error error={err}");
            None
        })
    }

    fn notify(&mut self, notice: &Notice) {
        if let Err(err) = writeln!(self.output, "{}", notice.message) {
            warn!("event=prompt_notify module=cli status=error error={err}");
        }
    }
}
