use std::borrow::Cow;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::MoveToColumn;
use crossterm::terminal::{Clear, ClearType};
use crossterm::execute;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, Reedline, Signal};

use super::{LineEditor, ReadOutcome};

mod line_validator;
use line_validator::MyshLineValidator;

pub struct Tty {
    line_editor: Reedline,
}

impl Tty {
    pub fn new() -> Tty {
        let line_editor = Reedline::create().with_validator(Box::new(MyshLineValidator));

        Tty { line_editor }
    }
}

impl LineEditor for Tty {
    fn read_line(&mut self, prompt: &ShellPrompt) -> Result<ReadOutcome> {
        match self.line_editor.read_line(prompt)? {
            Signal::Success(buffer) => Ok(ReadOutcome::Line(buffer)),
            Signal::CtrlC => Ok(ReadOutcome::Interrupted),
            Signal::CtrlD => Ok(ReadOutcome::Eof),
        }
    }

    // Reedline records submitted lines in its own history.
    fn add_history(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    // The prompt itself is painted by the next read_line().
    fn redraw(&mut self, _with_prompt: bool) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, MoveToColumn(0))?;
        Ok(())
    }

    fn reset_line(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Clear(ClearType::CurrentLine))?;
        stdout.flush()?;
        Ok(())
    }
}

// mysh:<PWD>>
pub struct ShellPrompt {
    pwd: String,
}

impl ShellPrompt {
    pub fn new(pwd: &str) -> Self {
        ShellPrompt {
            pwd: pwd.to_string(),
        }
    }

    pub fn text(&self) -> String {
        format!("mysh:{}> ", self.pwd)
    }
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.text())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }
}
