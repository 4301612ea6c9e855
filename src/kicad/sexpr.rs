//! S-expression tokenizer and parser.
//!
//! All KiCad text formats handled by this crate (`.kicad_pcb`, `.kicad_mod`,
//! `.net`) share one surface syntax:
//!
//! ```text
//! (module R_0402 (layer F.Cu)
//!   (pad 1 smd rect (at -0.51 0) (size 0.54 0.64))
//! )
//! ```
//!
//! A document is a single parenthesised list. List elements are either bare
//! atoms (symbols and numbers), quoted strings, or nested lists. The parser
//! keeps atoms as text; callers convert numbers where the schema expects
//! them.

use crate::kicad::error::{KicadError, KicadResult};
use std::fmt;

/// A parsed S-expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// Bare atom (symbol or number token).
    Atom(String),
    /// Quoted string (stored unescaped).
    Str(String),
    /// Parenthesised list.
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// Parses a complete document: exactly one top-level form.
    ///
    /// # Errors
    ///
    /// Returns an error on unbalanced parentheses, unterminated strings,
    /// an empty document, or trailing content after the first form.
    pub fn parse(text: &str) -> KicadResult<Self> {
        let mut parser = Parser::new(text);
        parser.skip_whitespace();
        let value = parser.parse_value()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(KicadError::parse_error(
                parser.pos,
                "trailing content after document",
            ));
        }
        Ok(value)
    }

    /// Returns the text of an atom or quoted string.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(s) | Self::Str(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the elements of a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the tag of a list (its first element, as an atom).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }

    /// Returns the first child list tagged `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Sexpr> {
        self.as_list()?
            .iter()
            .find(|item| item.name() == Some(name))
    }

    /// Returns all child lists tagged `name`.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Sexpr> + 'a {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |item| item.name() == Some(name))
    }

    /// Returns the positional argument at `index`, counting from the first
    /// element after the tag. `(pad 1 smd rect ...)` has `arg(0)` = `1`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Sexpr> {
        self.as_list()?.get(index + 1)
    }

    /// Returns the value of a `(name value)` child as text.
    #[must_use]
    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.child(name)?.arg(0)?.as_atom()
    }

    /// Returns the value of a `(name value)` child as a float.
    #[must_use]
    pub fn f64_value(&self, name: &str) -> Option<f64> {
        self.string_value(name)?.parse().ok()
    }

    /// Returns the value of a `(name value)` child as an unsigned integer.
    #[must_use]
    pub fn u32_value(&self, name: &str) -> Option<u32> {
        self.string_value(name)?.parse().ok()
    }
}

impl fmt::Display for Sexpr {
    /// Writes the compact single-line form, mainly for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(s) => f.write_str(s),
            Self::Str(s) => f.write_str(&quote(s)),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Writes a bare token, quoting only when the text demands it.
#[must_use]
pub fn token(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\\'));
    if needs_quotes {
        quote(s)
    } else {
        s.to_string()
    }
}

/// Quotes and escapes a string for S-expression output.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Formats a millimetre coordinate the way KiCad writes them: rounded to
/// nanometre precision, with no trailing zeros (`10` rather than `10.000000`).
#[must_use]
pub fn format_mm(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        // Collapses negative zero as well.
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Recursive-descent parser over the raw input bytes.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            input: text.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> KicadResult<Sexpr> {
        match self.peek() {
            Some(b'(') => self.parse_list(),
            Some(b'"') => self.parse_string(),
            Some(b')') => Err(KicadError::parse_error(self.pos, "unexpected ')'")),
            Some(_) => self.parse_atom(),
            None => Err(KicadError::parse_error(self.pos, "unexpected end of input")),
        }
    }

    fn parse_list(&mut self) -> KicadResult<Sexpr> {
        // Consume '('
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Sexpr::List(items));
                }
                Some(_) => items.push(self.parse_value()?),
                None => {
                    return Err(KicadError::parse_error(self.pos, "unclosed '('"));
                }
            }
        }
    }

    fn parse_string(&mut self) -> KicadResult<Sexpr> {
        let start = self.pos;
        // Consume opening quote
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Sexpr::Str(out));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'n') => out.push('\n'),
                        Some(b't') => out.push('\t'),
                        Some(c) => out.push(c as char),
                        None => {
                            return Err(KicadError::parse_error(start, "unterminated string"));
                        }
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    // Strings are UTF-8; copy the whole multi-byte sequence.
                    let rest = &self.input[self.pos..];
                    let text = std::str::from_utf8(rest)
                        .map_err(|_| KicadError::parse_error(self.pos, "invalid UTF-8"))?;
                    let c = text
                        .chars()
                        .next()
                        .ok_or_else(|| KicadError::parse_error(start, "unterminated string"))?;
                    out.push(c);
                    self.pos += c.len_utf8();
                }
                None => {
                    return Err(KicadError::parse_error(start, "unterminated string"));
                }
            }
        }
    }

    fn parse_atom(&mut self) -> KicadResult<Sexpr> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b'"') {
                break;
            }
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| KicadError::parse_error(start, "invalid UTF-8"))?;
        Ok(Sexpr::Atom(text.to_string()))
    }
}
