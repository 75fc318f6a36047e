//! Character stream and tokenizer.
//!
//! [`CharStream`] is an append-only character buffer with a one-way cursor:
//! the host may feed more text mid-stream, and the buffer is flushed (cleared,
//! cursor reset) once fully consumed. [`Lexer`] classifies runs of characters
//! into [`Token`]s and caches every token it produces, which makes one-step
//! pushback — the reader's only lookahead mechanism — a cursor decrement.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::one_of,
    combinator::{map, recognize},
};

use crate::token::{OPERATOR_CHARS, Token, TokenClass};
use crate::{Error, ReadError, ReadErrorKind};

/// Append-only character buffer with single-step lookahead.
#[derive(Debug, Default)]
pub struct CharStream {
    buf: String,
    pos: usize,
}

impl CharStream {
    pub fn new() -> Self {
        CharStream::default()
    }

    /// Next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.buf[self.pos..].chars().next()
    }

    /// Consume and return the next character
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Unconsumed tail of the buffer
    pub(crate) fn remaining(&self) -> &str {
        &self.buf[self.pos..]
    }

    pub(crate) fn advance_by(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    /// Append more input; the cursor is unaffected
    pub fn feed(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Clear the buffer and reset the cursor
    pub fn flush(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }

    /// True if nothing has been fed since construction or the last flush
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True if the cursor has consumed everything fed so far
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Recognize one token at the start of `input`. The alternatives are tried
/// in the same order the leading character is dispatched on: whitespace,
/// parenthesis, digit run, operator, then letter run. A leading `-` is
/// therefore always an operator, and `123abc` splits into a number and a
/// variable.
fn lex_token(input: &str) -> IResult<&str, Token> {
    alt((
        map(take_while1(char::is_whitespace), |s: &str| {
            Token::new(s, TokenClass::Whitespace)
        }),
        map(recognize(one_of("()")), |s: &str| {
            Token::new(s, TokenClass::Parenthesis)
        }),
        map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
            Token::new(s, TokenClass::Number)
        }),
        map(recognize(one_of(OPERATOR_CHARS)), |s: &str| {
            Token::new(s, TokenClass::Operator)
        }),
        map(take_while1(is_word_char), Token::word),
    ))
    .parse(input)
}

/// Tokenizer with an in-order token cache and one-step pushback.
#[derive(Debug, Default)]
pub struct Lexer {
    stream: CharStream,
    tokens: Vec<Token>,
    cursor: usize,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer::default()
    }

    /// Append raw input for subsequent tokens
    pub fn feed(&mut self, text: &str) {
        self.stream.feed(text);
    }

    /// Produce the next token, replaying cached tokens first.
    ///
    /// Returns `Ok(None)` at the end of available input. An unclassifiable
    /// leading character is a fatal [`ReadErrorKind::InvalidCharacter`].
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        if self.cursor < self.tokens.len() {
            let token = self.tokens[self.cursor].clone();
            self.cursor += 1;
            return Ok(Some(token));
        }

        let rest = self.stream.remaining();
        if rest.is_empty() {
            return Ok(None);
        }

        match lex_token(rest) {
            Ok((tail, token)) => {
                let consumed = rest.len() - tail.len();
                self.stream.advance_by(consumed);
                self.tokens.push(token.clone());
                self.cursor += 1;
                Ok(Some(token))
            }
            Err(_) => Err(Error::ReadError(ReadError::new(
                ReadErrorKind::InvalidCharacter,
                "no token class accepts this character",
                rest.chars().next().map(|c| c.to_string()),
            ))),
        }
    }

    /// Rewind the cursor by one token so the next call replays it
    pub fn push_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Current cursor position, for [`Lexer::rewind`]
    pub fn mark(&self) -> usize {
        self.cursor
    }

    /// Replay cached tokens from a previously taken mark
    pub fn rewind(&mut self, mark: usize) {
        self.cursor = mark;
    }

    /// True if no input has been fed since the last flush
    pub fn buffer_is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// True once every fed character has been consumed into tokens and every
    /// cached token has been read
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len() && self.stream.is_at_end()
    }

    /// Clear the stream and the token cache. Only sound once the cache has
    /// been fully consumed; the session flushes at that point.
    pub fn flush(&mut self) {
        self.stream.flush();
        self.tokens.clear();
        self.cursor = 0;
    }
}
