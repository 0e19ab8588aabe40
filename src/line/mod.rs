use anyhow::Result;
use unicode_segmentation::UnicodeSegmentation;

use std::io::BufRead;

use crate::shell::Session;

mod command;
pub use command::Command;
mod token;
use token::tokenize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseStatus {
    Complete,
    SyntaxError,
}

pub trait Parser {
    // Executes the commands found in `input` as they are recognized.
    // SyntaxError means at least one logical line was rejected; the lines
    // around it still ran.
    fn parse(&mut self, input: &mut dyn BufRead, session: &mut Session) -> Result<ParseStatus>;
}

// Reads one logical line at a time and runs its commands before reading
// the next.
pub struct LineParser;

impl Parser for LineParser {
    fn parse(&mut self, input: &mut dyn BufRead, session: &mut Session) -> Result<ParseStatus> {
        let mut status = ParseStatus::Complete;
        let mut line_num = 0;

        while let Some(text) = get_logical_line(input, &mut line_num)? {
            match tokenize(&text) {
                Ok(commands) => {
                    for command in commands {
                        command.execute(session)?;
                    }
                }
                Err(e) => {
                    eprintln!("mysh: line {}: syntax error: {}", line_num, e);
                    status = ParseStatus::SyntaxError;
                }
            }
        }

        Ok(status)
    }
}

// A logical line can span physical lines through quoting or a
// backslash-escaped newline.  At end of input the incomplete remainder is
// returned as is, and the tokenizer rejects it.  Invalid UTF-8 is replaced
// rather than rejected.
fn get_logical_line(input: &mut dyn BufRead, line_num: &mut usize) -> Result<Option<String>> {
    let mut buffer = String::new();
    let mut bytes = Vec::<u8>::new();

    loop {
        bytes.clear();

        if input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(if buffer.is_empty() { None } else { Some(buffer) });
        }

        *line_num += 1;
        buffer.push_str(&String::from_utf8_lossy(&bytes));

        if is_complete(&buffer) {
            return Ok(Some(buffer));
        }
    }
}

// Determines if `text` is a complete logical line.
pub fn is_complete(text: &str) -> bool {
    #[derive(PartialEq, Eq, Clone, Copy)]
    enum State {
        SingleQuoted,
        DoubleQuoted,
        Escaped,
        Comment,
        Unquoted,
    }

    let mut state = State::Unquoted;
    let mut escaped_state = State::Unquoted;
    let mut found_escaped_newline = false;
    let mut word_start = true;

    for grapheme in text.graphemes(true) {
        found_escaped_newline = false;

        state = match state {
            State::Unquoted => {
                let next = match grapheme {
                    "\'" => State::SingleQuoted,
                    "\"" => State::DoubleQuoted,
                    "\\" => {
                        escaped_state = State::Unquoted;
                        State::Escaped
                    }
                    "#" if word_start => State::Comment,
                    _ => state,
                };

                word_start = matches!(grapheme, " " | "\t" | "\n" | "\r\n" | ";");
                next
            }
            State::Comment => match grapheme {
                "\n" | "\r\n" => {
                    word_start = true;
                    State::Unquoted
                }
                _ => state,
            },
            State::SingleQuoted => match grapheme {
                "\'" => State::Unquoted,
                _ => state,
            },
            State::DoubleQuoted => match grapheme {
                "\"" => State::Unquoted,
                "\\" => {
                    escaped_state = State::DoubleQuoted;
                    State::Escaped
                }
                _ => state,
            },
            State::Escaped => {
                if grapheme == "\n" || grapheme == "\r\n" {
                    found_escaped_newline = true;
                }

                escaped_state
            }
        };
    }

    matches!(state, State::Unquoted | State::Comment) && !found_escaped_newline
}
