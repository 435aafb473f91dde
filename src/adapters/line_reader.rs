//! Line-oriented tokenizer shared by the text adapters.

use std::str::{FromStr, Lines};

/// A problem with a specific 1-based input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub reason: String,
}

/// Hands out whitespace-separated records one line at a time.
pub struct LineReader<'a> {
    lines: Lines<'a>,
    line: usize,
}

/// The tokens of one line.
pub struct Record<'a> {
    pub line: usize,
    pub tokens: Vec<&'a str>,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    /// Number of the most recently returned line, 0 before the first.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next line and checks it has exactly `expected` tokens.
    pub fn next_record(&mut self, expected: usize, what: &str) -> Result<Record<'a>, LineError> {
        let Some(raw) = self.lines.next() else {
            return Err(LineError {
                line: self.line + 1,
                reason: format!("unexpected end of input, expected {what}"),
            });
        };
        self.line += 1;

        let tokens: Vec<&str> = raw.split_ascii_whitespace().collect();
        if tokens.len() != expected {
            return Err(LineError {
                line: self.line,
                reason: format!(
                    "expected {what} ({expected} fields), found {} fields",
                    tokens.len()
                ),
            });
        }
        Ok(Record {
            line: self.line,
            tokens,
        })
    }
}

impl Record<'_> {
    /// Parses token `index` as `T`, naming `field` in the error.
    pub fn parse<T: FromStr>(&self, index: usize, field: &str) -> Result<T, LineError> {
        let token = self.tokens[index];
        token.parse::<T>().map_err(|_| LineError {
            line: self.line,
            reason: format!("invalid {field} {token:?}"),
        })
    }
}
