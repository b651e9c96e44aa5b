//! User prompts.
//!
//! The interactive walk only needs to show a list of choices and get one back, so
//! it talks to the `Prompt` trait. `TerminalPrompt` is the line-based terminal
//! implementation used by the CLI.

use std::io::{self, BufRead};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::error::{Error, Result};

/// Capability to ask the user questions.
///
/// Implementations return indices into the `choices` slice they were given.
pub trait Prompt {
    /// Pick exactly one of `choices`.
    fn select(&mut self, message: &str, choices: &[String], default: Option<usize>) -> Result<usize>;

    /// Pick any number of `choices`.
    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Vec<usize>>;

    /// Yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Numbered-menu prompt reading answers line by line.
///
/// An answer is either the 1-based number of a choice or its label
/// (case-insensitive). An empty answer takes the default.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: WriteColor> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompt and return its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn write_question(&mut self, message: &str) -> io::Result<()> {
        self.output
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.output, "? ")?;
        self.output.reset()?;
        self.output.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(self.output, "{}", message)?;
        self.output.reset()
    }

    fn write_choices(&mut self, choices: &[String], default: Option<usize>) -> io::Result<()> {
        for (i, choice) in choices.iter().enumerate() {
            self.output
                .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(self.output, "  {:>2})", i + 1)?;
            self.output.reset()?;
            write!(self.output, " {}", choice)?;
            if default == Some(i) {
                self.output
                    .set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
                write!(self.output, " (default)")?;
                self.output.reset()?;
            }
            writeln!(self.output)?;
        }
        Ok(())
    }

    fn write_hint(&mut self, hint: &str) -> io::Result<()> {
        self.output
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(self.output, "  {}", hint)?;
        self.output.reset()
    }

    /// Read one answer line, trimmed. EOF is `PromptClosed`.
    fn read_answer(&mut self, marker: &str) -> Result<String> {
        write!(self.output, "{} ", marker).map_err(stdout_error)?;
        self.output.flush().map_err(stdout_error)?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::io("<stdin>", e))?;
        if read == 0 {
            return Err(Error::PromptClosed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: WriteColor> Prompt for TerminalPrompt<R, W> {
    fn select(&mut self, message: &str, choices: &[String], default: Option<usize>) -> Result<usize> {
        self.write_question(message).map_err(stdout_error)?;
        self.write_choices(choices, default).map_err(stdout_error)?;
        loop {
            let answer = self.read_answer(">")?;
            if answer.is_empty() {
                if let Some(index) = default {
                    return Ok(index);
                }
            } else if let Some(index) = parse_choice(&answer, choices) {
                return Ok(index);
            }
            self.write_hint(&format!("Enter a number between 1 and {}", choices.len()))
                .map_err(stdout_error)?;
        }
    }

    fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Vec<usize>> {
        self.write_question(message).map_err(stdout_error)?;
        self.write_choices(choices, None).map_err(stdout_error)?;
        'ask: loop {
            let answer = self.read_answer(">>")?;
            let mut picked = Vec::new();
            for token in answer
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                match parse_choice(token, choices) {
                    Some(index) if !picked.contains(&index) => picked.push(index),
                    Some(_) => {}
                    None => {
                        self.write_hint("Enter choice numbers separated by commas or spaces")
                            .map_err(stdout_error)?;
                        continue 'ask;
                    }
                }
            }
            return Ok(picked);
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        self.write_question(&format!("{} {}", message, suffix))
            .map_err(stdout_error)?;
        loop {
            let answer = self.read_answer(">")?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.write_hint("Answer y or n").map_err(stdout_error)?,
            }
        }
    }
}

/// Match an answer against choices by 1-based number or by label.
fn parse_choice(answer: &str, choices: &[String]) -> Option<usize> {
    if let Ok(number) = answer.parse::<usize>() {
        return (1..=choices.len()).contains(&number).then(|| number - 1);
    }
    choices
        .iter()
        .position(|choice| choice.eq_ignore_ascii_case(answer))
}

fn stdout_error(e: io::Error) -> Error {
    Error::io("<stdout>", e)
}
