//! Condition map: which wells of the plate belong to which experimental
//! condition (cell line, treatment, ...).
//!
//! The file holds a Python-style dict literal, e.g.
//!
//! ```text
//! {
//!     'K2_16': ['A1', 'A2', 'B1'],
//!     'empty': ['D4', 'D6'],   # unused wells
//! }
//! ```
//!
//! Only the shape `{string: [string, ...], ...}` is accepted. Tuples are
//! accepted in place of lists. Anything else fails with the position of the
//! offending character.

use std::fs;
use std::path::Path;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionGroup {
    pub name: String,
    pub wells: Vec<String>,
}

/// Conditions in file order. Each condition keeps its wells in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionMap {
    pub groups: Vec<ConditionGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ConditionMap {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::parse(&text).map_err(|e| PipelineError::MalformedConditions {
            path: path.to_path_buf(),
            line: e.line,
            column: e.column,
            message: e.message,
        })
    }

    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        Parser::new(text).parse_map()
    }

    /// `{condition}_{well}` for every pair, in map order then well order.
    /// This order defines the columns of every summary.
    pub fn condition_labels(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.wells.iter().map(move |w| composite_label(&g.name, w)))
            .collect()
    }

    pub fn n_wells(&self) -> usize {
        self.groups.iter().map(|g| g.wells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn composite_label(condition: &str, well: &str) -> String {
    format!("{condition}_{well}")
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '#' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if c.is_whitespace() || c == '\u{feff}' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_trivia();
        self.chars.peek().copied()
    }

    fn expect(&mut self, want: char) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}', found end of file"))),
        }
    }

    fn parse_map(mut self) -> Result<ConditionMap, SyntaxError> {
        self.expect('{')?;
        let mut groups: Vec<ConditionGroup> = Vec::new();
        loop {
            if self.peek() == Some('}') {
                self.bump();
                break;
            }
            let (line, column) = (self.line, self.column);
            let name = self.parse_string("condition name")?;
            if groups.iter().any(|g| g.name == name) {
                return Err(SyntaxError {
                    line,
                    column,
                    message: format!("duplicate condition '{name}'"),
                });
            }
            self.expect(':')?;
            let wells = self.parse_sequence()?;
            groups.push(ConditionGroup { name, wells });
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated mapping")),
            }
        }
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected '{c}' after mapping")));
        }
        Ok(ConditionMap { groups })
    }

    fn parse_sequence(&mut self) -> Result<Vec<String>, SyntaxError> {
        let close = match self.peek() {
            Some('[') => ']',
            Some('(') => ')',
            Some(c) => {
                return Err(self.error(format!("expected a list of well labels, found '{c}'")));
            }
            None => return Err(self.error("expected a list of well labels, found end of file")),
        };
        self.bump();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.peek() == Some(close) {
                self.bump();
                break;
            }
            items.push(self.parse_string("well label")?);
            trailing_comma = false;
            match self.peek() {
                Some(',') => {
                    self.bump();
                    trailing_comma = true;
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{close}', found '{c}'")));
                }
                None => return Err(self.error("unterminated list of well labels")),
            }
        }
        if close == ')' && items.len() == 1 && !trailing_comma {
            return Err(self.error("parenthesized single label is not a tuple; add a trailing comma"));
        }
        Ok(items)
    }

    fn parse_string(&mut self, what: &str) -> Result<String, SyntaxError> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            Some(c) => return Err(self.error(format!("expected quoted {what}, found '{c}'"))),
            None => return Err(self.error(format!("expected quoted {what}, found end of file"))),
        };
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => return Err(self.error(format!("unsupported escape '\\{c}'"))),
                    None => return Err(self.error("unterminated string")),
                },
                Some('\n') | None => return Err(self.error("unterminated string")),
                Some(c) => out.push(c),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/conditions.rs"]
mod tests;
