//! sexpread - S-expression reader and printer over integer-indexed storage
//!
//! This crate is a minimal symbolic-expression front end: it turns raw
//! character text into a parenthesized tree and renders that tree back to
//! text, using only integer-indexed storage. There are no pointers between
//! tree cells and no garbage collector: atoms live in a fixed-capacity
//! open-addressing symbol table, and list cells live in a growable free-list
//! arena addressed by 1-based indices.
//!
//! ```
//! use sexpread::reader::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! session.feed("(a (b c))");
//! let root = session.read().unwrap();
//! assert_eq!(session.render(root), "( a ( b c ) ) ");
//! session.free(root);
//! ```
//!
//! There is deliberately no evaluator: `define`, `lambda`, `if` and `cond`
//! are recognized as keywords but never interpreted. The crate only reads
//! and re-prints.
//!
//! ## Modules
//!
//! - `token`: token model and character classes
//! - `lexer`: character stream and pushback-capable tokenizer
//! - `symbols`: open-addressing symbol interner
//! - `arena`: free-list node pool encoding trees as index pairs
//! - `reader`: the `read`/`print` algorithms and the host-driven session

use std::fmt;

/// Maximum list nesting accepted by `read`.
/// Limits recursion depth so hostile input cannot overflow the stack.
pub const MAX_READ_DEPTH: usize = 32;

/// Categorizes the different kinds of read failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReadErrorKind {
    /// A character no token class accepts (there is no string or escape
    /// syntax, so this is unrecoverable for the current input)
    InvalidCharacter,
    /// Input ended before a matching close parenthesis
    Incomplete,
    /// List nesting exceeded [`MAX_READ_DEPTH`]
    TooDeeplyNested,
}

/// A structured error describing a read failure.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub message: String,
    /// The problematic character or token, if identifiable
    pub found: Option<String>,
}

impl ReadError {
    pub fn new(kind: ReadErrorKind, message: impl Into<String>, found: Option<String>) -> Self {
        ReadError {
            kind,
            message: message.into(),
            found,
        }
    }

    /// Create a ReadError with a kind and message but no offending text
    pub fn from_message(kind: ReadErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, message, None)
    }
}

/// Error types for the reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ReadError(ReadError),
    /// Every slot of the symbol table probed without finding room.
    /// Recoverable: the current expression is rejected, the session survives.
    SymbolTableFull { capacity: usize },
    /// Operation the data structure never supports (e.g. interner deletion)
    UnsupportedOperation(&'static str),
}

impl Error {
    /// Shorthand for an incomplete-expression error
    pub(crate) fn incomplete(message: impl Into<String>) -> Self {
        Error::ReadError(ReadError::from_message(ReadErrorKind::Incomplete, message))
    }

    /// True when more input could complete the failed read
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Error::ReadError(ReadError {
                kind: ReadErrorKind::Incomplete,
                ..
            })
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadError(e) => {
                write!(f, "ReadError: {}", e.message)?;
                if let Some(found) = &e.found {
                    write!(f, "\nFound: {found}")?;
                }
                Ok(())
            }
            Error::SymbolTableFull { capacity } => {
                write!(f, "SymbolTableFull: all {capacity} slots occupied")
            }
            Error::UnsupportedOperation(op) => write!(f, "UnsupportedOperation: {op}"),
        }
    }
}

pub mod arena;
pub mod lexer;
pub mod reader;
pub mod symbols;
pub mod token;
