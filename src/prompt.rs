//! Operator prompting for destination conflicts.
//!
//! The linker never reads input itself; it asks a [`Prompt`] and interprets
//! the answer with [`ConflictChoice::parse`].  Production code uses
//! [`TerminalPrompt`]; tests substitute a scripted implementation.
use std::io::{self, IsTerminal as _};

use inquire::error::{CustomUserError, InquireError};
use inquire::validator::Validation;

/// Capability to ask the operator a question.
///
/// Implementations may validate the answer against `allowed` themselves, but
/// callers re-check it and ask again when it is not recognised.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Ask `message` and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read, the operator cancels, or
    /// input is exhausted.
    fn ask(&self, message: &str, allowed: &[&'static str]) -> io::Result<String>;
}

/// Operator answer to an existing-destination conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Keep the existing destination (the default).
    Keep,
    /// Overwrite this destination only.
    Overwrite,
    /// Overwrite this and every later conflict without asking.
    OverwriteAll,
    /// Keep this and every later conflicting destination without asking.
    SkipAll,
}

impl ConflictChoice {
    /// Every accepted answer, compared case-insensitively.  The empty answer
    /// selects the default.
    pub const RESPONSES: &'static [&'static str] = &["n", "", "y", "a", "all", "none"];

    /// Interpret an answer; `None` if it is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotcon::prompt::ConflictChoice;
    ///
    /// assert_eq!(ConflictChoice::parse(""), Some(ConflictChoice::Keep));
    /// assert_eq!(ConflictChoice::parse("ALL"), Some(ConflictChoice::OverwriteAll));
    /// assert_eq!(ConflictChoice::parse("maybe"), None);
    /// ```
    #[must_use]
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "" | "n" => Some(Self::Keep),
            "y" => Some(Self::Overwrite),
            "a" | "all" => Some(Self::OverwriteAll),
            "none" => Some(Self::SkipAll),
            _ => None,
        }
    }
}

/// Prompt backed by the controlling terminal.
///
/// With an interactive stdin the question is rendered by [`inquire`] and
/// unrecognised answers are rejected in place.  Otherwise one line is read
/// from stdin per question, which lets answers be piped in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, message: &str, allowed: &[&'static str]) -> io::Result<String> {
        if io::stdin().is_terminal() {
            ask_interactive(message, allowed)
        } else {
            read_answer(&mut io::stdin().lock())
        }
    }
}

fn ask_interactive(message: &str, allowed: &[&'static str]) -> io::Result<String> {
    let allowed: Vec<String> = allowed.iter().map(|a| a.to_lowercase()).collect();
    let validator = move |input: &str| -> Result<Validation, CustomUserError> {
        let answer = input.trim().to_lowercase();
        if allowed.contains(&answer) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid("Not a valid choice.".into()))
        }
    };
    inquire::Text::new(message)
        .with_validator(validator)
        .prompt()
        .map_err(|e| match e {
            InquireError::IO(err) => err,
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                io::Error::new(io::ErrorKind::Interrupted, "prompt cancelled by operator")
            }
            other => io::Error::other(other.to_string()),
        })
}

/// Read one answer line; end of input is an error so a pending conflict
/// cannot spin forever.
fn read_answer(input: &mut impl io::BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
