// Line editor used when standard input is not a terminal, e.g.
// `printf 'cd /\n' | mysh`.  No prompt is painted and nothing needs
// redrawing.

use anyhow::Result;

use std::io::{self, BufRead, StdinLock};

use super::tty::ShellPrompt;
use super::{LineEditor, ReadOutcome};
use crate::line::is_complete;

pub struct BasicTty<R> {
    input: R,
}

impl BasicTty<StdinLock<'static>> {
    pub fn stdin() -> Self {
        BasicTty::new(io::stdin().lock())
    }
}

impl<R: BufRead> BasicTty<R> {
    pub fn new(input: R) -> Self {
        BasicTty { input }
    }
}

impl<R: BufRead> LineEditor for BasicTty<R> {
    // Physical lines are joined until quotes and escapes are closed, the
    // way the terminal's validator keeps the editor open.
    fn read_line(&mut self, _prompt: &ShellPrompt) -> Result<ReadOutcome> {
        let mut buffer = String::new();
        let mut bytes = Vec::<u8>::new();

        loop {
            bytes.clear();

            if self.input.read_until(b'\n', &mut bytes)? == 0 {
                if buffer.is_empty() {
                    return Ok(ReadOutcome::Eof);
                }
                break;
            }

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            if is_complete(&buffer) {
                break;
            }
        }

        // `line` should not contain the trailing newline
        let len = buffer.trim_end_matches(|c| c == '\n' || c == '\r').len();
        buffer.truncate(len);

        Ok(ReadOutcome::Line(buffer))
    }

    fn add_history(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    fn redraw(&mut self, _with_prompt: bool) -> Result<()> {
        Ok(())
    }

    fn reset_line(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    use std::io::Cursor;

    #[test]
    fn reads_lines_until_eof() {
        let prompt = ShellPrompt::new("/");
        let mut editor = BasicTty::new(Cursor::new(b"cd /\r\n\nX=\xff".to_vec()));

        assert_eq!(editor.read_line(&prompt).unwrap(), ReadOutcome::Line("cd /".to_string()));
        assert_eq!(editor.read_line(&prompt).unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(
            editor.read_line(&prompt).unwrap(),
            ReadOutcome::Line("X=\u{fffd}".to_string())
        );
        assert_eq!(editor.read_line(&prompt).unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn joins_continued_lines() {
        let prompt = ShellPrompt::new("/");
        let mut editor = BasicTty::new(Cursor::new(b"echo 'a\nb'\ncd \\\n/\necho 'open\n".to_vec()));

        assert_eq!(
            editor.read_line(&prompt).unwrap(),
            ReadOutcome::Line("echo 'a\nb'".to_string())
        );
        assert_eq!(
            editor.read_line(&prompt).unwrap(),
            ReadOutcome::Line("cd \\\n/".to_string())
        );
        assert_eq!(
            editor.read_line(&prompt).unwrap(),
            ReadOutcome::Line("echo 'open".to_string())
        );
        assert_eq!(editor.read_line(&prompt).unwrap(), ReadOutcome::Eof);
    }
}
