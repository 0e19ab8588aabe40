use anyhow::Result;

use tty::ShellPrompt;

pub mod basic_tty;
pub mod signal;
pub mod tty;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ReadOutcome {
    Line(String),
    Interrupted, // The user aborted the line being edited
    Eof,
}

// The hooks the interactive loop drives on the line-editing subsystem.
pub trait LineEditor {
    fn read_line(&mut self, prompt: &ShellPrompt) -> Result<ReadOutcome>;
    fn add_history(&mut self, line: &str) -> Result<()>;

    // Called after an interrupt.  `with_prompt` is set when the interrupt
    // arrived while the user was typing.
    fn redraw(&mut self, with_prompt: bool) -> Result<()>;

    // Drops whatever was left of the line being edited.
    fn reset_line(&mut self) -> Result<()>;
}
