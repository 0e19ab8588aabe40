// Breaks a logical line into commands and each command into words,
// following the quoting rules.  Expansions are kept unevaluated until the
// command runs, so `cd /tmp; echo $PWD` sees the new directory.

use anyhow::{bail, Result};
use unicode_segmentation::{Graphemes, UnicodeSegmentation};

use std::iter::Peekable;
use std::mem;

use super::Command;
use crate::shell::state::State;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Quote {
    SingleQuoted,
    DoubleQuoted,
    Unquoted,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Part {
    Literal(String),
    Variable(String), // $NAME or ${NAME}
    ReturnValue,      // $?
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Word {
    assignment: Option<String>, // NAME, when the word reads NAME=value
    parts: Vec<Part>,
    quoted: bool,
}

impl Word {
    pub fn name(&self) -> Option<&str> {
        self.assignment.as_deref()
    }

    // The expanded text, without any NAME= prefix
    pub fn value(&self, state: &State) -> String {
        let mut text = String::new();

        for part in &self.parts {
            match part {
                Part::Literal(s) => text.push_str(s),
                Part::Variable(name) => text.push_str(state.get(name).unwrap_or_default()),
                Part::ReturnValue => text.push_str(&state.rv().to_string()),
            }
        }

        text
    }

    // The word as a command argument.  An unquoted word that expands to
    // nothing is dropped.
    pub fn expand(&self, state: &State) -> Option<String> {
        let value = self.value(state);

        match &self.assignment {
            Some(name) => Some(format!("{}={}", name, value)),
            None if value.is_empty() && !self.quoted => None,
            None => Some(value),
        }
    }
}

#[derive(Default)]
struct WordBuilder {
    word: Word,
    touched: bool,
    // Set once anything other than a bare unquoted character was seen;
    // such a word can no longer become an assignment.
    mixed: bool,
}

impl WordBuilder {
    fn is_empty(&self) -> bool {
        !self.touched
    }

    fn literal(&mut self, text: &str) {
        self.touched = true;

        if let Some(Part::Literal(s)) = self.word.parts.last_mut() {
            s.push_str(text);
        } else {
            self.word.parts.push(Part::Literal(text.to_string()));
        }
    }

    fn escaped(&mut self, text: &str) {
        self.mixed = true;
        self.literal(text);
    }

    fn quote(&mut self) {
        self.touched = true;
        self.mixed = true;
        self.word.quoted = true;
    }

    fn expansion(&mut self, part: Part) {
        self.touched = true;
        self.mixed = true;
        self.word.parts.push(part);
    }

    fn equals(&mut self) {
        if self.word.assignment.is_none() && !self.mixed {
            if let [Part::Literal(name)] = self.word.parts.as_slice() {
                if is_name(name) {
                    self.word.assignment = Some(name.clone());
                    self.word.parts.clear();
                    return;
                }
            }
        }

        self.literal("=");
    }

    fn finish(&mut self, words: &mut Vec<Word>) {
        if self.touched {
            words.push(mem::take(&mut self.word));
        }

        *self = WordBuilder::default();
    }
}

pub fn tokenize(text: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::<Command>::new();
    let mut words = Vec::<Word>::new();
    let mut word = WordBuilder::default();
    let mut quote = Quote::Unquoted;

    let mut graphemes = text.graphemes(true).peekable();

    while let Some(grapheme) = graphemes.next() {
        match quote {
            Quote::Unquoted => match grapheme {
                " " | "\t" => word.finish(&mut words),
                "\n" | "\r\n" | ";" => {
                    word.finish(&mut words);

                    if !words.is_empty() {
                        commands.push(Command::new(mem::take(&mut words)));
                    } else if grapheme == ";" {
                        bail!("unexpected token ';'");
                    }
                }
                "'" => {
                    quote = Quote::SingleQuoted;
                    word.quote();
                }
                "\"" => {
                    quote = Quote::DoubleQuoted;
                    word.quote();
                }
                "\\" => match graphemes.next() {
                    Some("\n") | Some("\r\n") => {} // Line continuation
                    Some(escaped) => word.escaped(escaped),
                    None => bail!("unexpected end of input after '\\'"),
                },
                "$" => word.expansion(get_expansion(&mut graphemes)?),
                "#" if word.is_empty() => {
                    while let Some(&next) = graphemes.peek() {
                        if next == "\n" || next == "\r\n" {
                            break;
                        }
                        graphemes.next();
                    }
                }
                "|" | "&" | "<" | ">" => bail!("unsupported operator '{}'", grapheme),
                "=" => word.equals(),
                _ => word.literal(grapheme),
            },
            Quote::SingleQuoted => match grapheme {
                "'" => quote = Quote::Unquoted,
                _ => word.escaped(grapheme),
            },
            Quote::DoubleQuoted => match grapheme {
                "\"" => quote = Quote::Unquoted,
                "\\" => match graphemes.next() {
                    Some(c @ ("\"" | "\\" | "$" | "`")) => word.escaped(c),
                    Some("\n") | Some("\r\n") => {}
                    Some(c) => {
                        word.escaped("\\");
                        word.escaped(c);
                    }
                    None => bail!("unexpected end of input: unterminated quote"),
                },
                "$" => word.expansion(get_expansion(&mut graphemes)?),
                _ => word.escaped(grapheme),
            },
        }
    }

    if quote != Quote::Unquoted {
        bail!("unexpected end of input: unterminated quote");
    }

    word.finish(&mut words);
    if !words.is_empty() {
        commands.push(Command::new(words));
    }

    Ok(commands)
}

// Called just after a '$'
fn get_expansion(graphemes: &mut Peekable<Graphemes<'_>>) -> Result<Part> {
    match graphemes.peek().copied() {
        Some("?") => {
            graphemes.next();
            Ok(Part::ReturnValue)
        }
        Some("{") => {
            graphemes.next();

            let mut name = String::new();
            loop {
                match graphemes.next() {
                    Some("}") => break,
                    Some(g) => name.push_str(g),
                    None => bail!("unexpected end of input: unterminated '${{'"),
                }
            }

            if !is_name(&name) {
                bail!("bad substitution: '${{{}}}'", name);
            }

            Ok(Part::Variable(name))
        }
        Some(g) if starts_name(g) => {
            let mut name = String::new();

            while let Some(g) = graphemes.peek().copied() {
                if !is_name_char(g) {
                    break;
                }
                name.push_str(g);
                graphemes.next();
            }

            Ok(Part::Variable(name))
        }
        _ => Ok(Part::Literal("$".to_string())),
    }
}

fn starts_name(g: &str) -> bool {
    g.chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
}

fn is_name_char(g: &str) -> bool {
    !g.is_empty() && g.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_name(text: &str) -> bool {
    starts_name(text) && is_name_char(text)
}
