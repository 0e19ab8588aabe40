use crate::line::{LineParser, ParseStatus, Parser};
use crate::sources::signal::{self, InterruptHandler, Redraw};
use crate::sources::tty::ShellPrompt;
use crate::sources::{LineEditor, ReadOutcome};

use anyhow::{Context, Result};
use tracing::debug;

use std::fs::File;
use std::io::{self, BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

mod init;
pub mod modules;
pub mod state;
#[cfg(test)]
pub mod testing;

pub use init::init_script_path;
use init::init;
use modules::Builtins;
use state::State;

// Syntax failures and runtime failures share a status.
pub const SYNTAX_ERR: i32 = 1;
pub const RUNTIME_ERR: i32 = 1;
pub const NOT_EXECUTABLE: i32 = 126;
pub const NOT_FOUND: i32 = 127;
pub const SIG_VAL: i32 = 128;

// Everything a command can see or change while it runs.
#[derive(Default)]
pub struct Session {
    pub state: State,
    pub builtins: Builtins,
}

impl Session {
    pub fn reset(&mut self) {
        self.state.reset();
        self.builtins.clear();
    }
}

pub struct Shell {
    session: Session,
    parser: Box<dyn Parser>,
    init_script: Option<PathBuf>,
}

impl Shell {
    pub fn new() -> Shell {
        Shell::with_parser(Box::new(LineParser))
    }

    pub fn with_parser(parser: Box<dyn Parser>) -> Shell {
        Shell {
            session: Session::default(),
            parser,
            init_script: None,
        }
    }

    // Sourced at the start of interactive mode only.
    pub fn set_init_script(&mut self, path: Option<PathBuf>) {
        self.init_script = path;
    }

    pub fn run_interactive(&mut self, editor: &mut dyn LineEditor) -> Result<i32> {
        init(&mut self.session)?;

        let outcome = self.source_init_script().and_then(|()| {
            let _interrupts = InterruptHandler::install()?;
            self.interactive_loop(editor)
        });

        let rv = self.finish();
        outcome?;

        // Leave the terminal on a clean line
        let mut stdout = io::stdout();
        stdout.write_all(b"\n")?;
        stdout.flush()?;

        Ok(rv)
    }

    pub fn run_file(&mut self, path: &Path) -> Result<i32> {
        init(&mut self.session)?;

        let status = File::open(path)
            .with_context(|| format!("{}", path.display()))
            .and_then(|file| {
                self.parser
                    .parse(&mut BufReader::new(file), &mut self.session)
            });

        let rv = self.finish();

        // A syntax error anywhere in the file wins over the last command
        match status? {
            ParseStatus::SyntaxError => Ok(SYNTAX_ERR),
            ParseStatus::Complete => Ok(rv),
        }
    }

    pub fn run_string(&mut self, text: &str) -> Result<i32> {
        init(&mut self.session)?;

        let outcome = self.execute_unit(text);

        let rv = self.finish();
        outcome?;

        Ok(rv)
    }

    // Runs one interactive line or one `-c` string.
    pub fn execute_unit(&mut self, text: &str) -> Result<i32> {
        if text.is_empty() {
            return Ok(0);
        }

        // The parser expects newline-terminated input
        let mut buffer = Cursor::new(format!("{}\n", text));

        match self.parser.parse(&mut buffer, &mut self.session)? {
            ParseStatus::SyntaxError => {
                self.session.state.set_rv(SYNTAX_ERR);
                Ok(SYNTAX_ERR)
            }
            ParseStatus::Complete => Ok(self.session.state.rv()),
        }
    }

    fn interactive_loop(&mut self, editor: &mut dyn LineEditor) -> Result<()> {
        loop {
            let prompt = ShellPrompt::new(self.session.state.get("PWD").unwrap_or_default());

            signal::set_awaiting_input(true);
            let outcome = editor.read_line(&prompt);
            signal::set_awaiting_input(false);

            match outcome? {
                ReadOutcome::Line(line) => {
                    if !line.is_empty() {
                        editor.add_history(&line)?;
                    }

                    self.execute_unit(&line)?;
                }
                ReadOutcome::Interrupted => {
                    editor.redraw(true)?;
                    editor.reset_line()?;
                }
                ReadOutcome::Eof => break,
            }

            if let Some(redraw) = signal::take_pending_redraw() {
                editor.redraw(redraw == Redraw::WithPrompt)?;
                editor.reset_line()?;
            }
        }

        Ok(())
    }

    fn source_init_script(&mut self) -> Result<()> {
        let path = match &self.init_script {
            Some(path) => path.clone(),
            None => return Ok(()),
        };

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("mysh: {}: {}", path.display(), e);
                return Ok(());
            }
        };

        debug!(path = %path.display(), "sourcing init script");

        let status = self
            .parser
            .parse(&mut BufReader::new(file), &mut self.session)?;

        if status == ParseStatus::SyntaxError {
            self.session.state.set_rv(SYNTAX_ERR);
        }

        Ok(())
    }

    // Reads the final return value and resets the session for the next
    // independent invocation.
    fn finish(&mut self) -> i32 {
        let rv = self.session.state.rv();
        self.session.reset();

        debug!(rv, "session reset");

        rv
    }
}
