//! The `read` and `print` algorithms, and the session that owns their state.
//!
//! [`Session`] bundles one [`Lexer`], one [`SymbolTable`] and one
//! [`NodeArena`] — the complete state of an interpreter front end. `read`
//! pulls tokens, interns their text, and threads arena cells into a
//! right-linked list, recursing on nested parentheses via the lexer's
//! one-token pushback. `print` walks a [`NodeRef`] tree back into
//! parenthesized, space-separated text without consuming it.
//!
//! The host application sits entirely behind the [`Host`] trait: a blocking
//! "give me a line" call and a "take this output" call. [`Session::run`]
//! drives the classic loop — feed when the buffer is empty, read once, print
//! the result, flush when the buffer is spent — and re-requests input when
//! an expression is left open at the end of a line.

use crate::arena::{NodeArena, NodeIndex, NodeRef};
use crate::lexer::Lexer;
use crate::symbols::SymbolTable;
use crate::token::{Token, TokenClass};
use crate::{Error, MAX_READ_DEPTH, ReadError, ReadErrorKind};

/// The two callbacks the host supplies; the entire external boundary.
///
/// Both are synchronous and are only ever called from the session's thread.
/// They must not recurse into the session.
pub trait Host {
    /// Next chunk of raw source text, or `None` when the host has no more
    /// input. May block. Prompting the user is the host's concern.
    fn read_line(&mut self) -> Option<String>;

    /// Consume a fragment of rendered output. A newline arrives once per
    /// top-level read/print cycle; no other framing is guaranteed.
    fn write(&mut self, text: &str);
}

/// Construction parameters for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Slot count of the symbol interner, fixed for the session's lifetime
    pub symbol_capacity: usize,
    /// Initial arena capacity; the arena doubles on demand
    pub node_capacity: usize,
    /// When false the arena runs append-only and freeing is a no-op
    pub reclaim_nodes: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            symbol_capacity: 997,
            node_capacity: 128,
            reclaim_nodes: true,
        }
    }
}

/// One interpreter session: lexer, interner and arena under single ownership.
///
/// Sessions are independent; create one per REPL. A session is
/// single-threaded by design and must not be shared across threads.
#[derive(Debug)]
pub struct Session {
    lexer: Lexer,
    symbols: SymbolTable<()>,
    arena: NodeArena,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let arena = if config.reclaim_nodes {
            NodeArena::new(config.node_capacity)
        } else {
            NodeArena::append_only()
        };
        Session {
            lexer: Lexer::new(),
            symbols: SymbolTable::new(config.symbol_capacity),
            arena,
        }
    }

    /// Append raw source text to the token buffer
    pub fn feed(&mut self, text: &str) {
        self.lexer.feed(text);
    }

    pub fn symbols(&self) -> &SymbolTable<()> {
        &self.symbols
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Read one expression from the buffered input.
    ///
    /// Returns [`NodeRef::Empty`] when no significant token remains,
    /// [`NodeRef::Atom`] for a bare atom (including a stray close
    /// parenthesis, whose text is interned like any other token), and
    /// [`NodeRef::Node`] for the head cell of a list.
    ///
    /// End of input inside an open list is an [`ReadErrorKind::Incomplete`]
    /// error; every cell the failed read allocated is returned to the arena
    /// first, so the expression can be retried once more input arrives.
    pub fn read(&mut self) -> Result<NodeRef, Error> {
        self.read_at_depth(0)
    }

    fn read_at_depth(&mut self, depth: usize) -> Result<NodeRef, Error> {
        if depth >= MAX_READ_DEPTH {
            return Err(Error::ReadError(ReadError::from_message(
                ReadErrorKind::TooDeeplyNested,
                format!("list nesting exceeds {MAX_READ_DEPTH} levels"),
            )));
        }

        let Some(token) = self.next_significant()? else {
            return Ok(NodeRef::Empty);
        };

        let id = self.symbols.insert(&token.text, ())?;
        if !token.is_open_paren() {
            return Ok(NodeRef::Atom(id));
        }

        let mut head = NodeRef::Empty;
        match self.fill_list(depth, &mut head) {
            Ok(()) => Ok(head),
            Err(err) => {
                self.arena.free(head);
                Err(err)
            }
        }
    }

    /// Consume list elements up to the matching close parenthesis, threading
    /// them through `right` links. `head` is updated as soon as the first
    /// cell exists so the caller can reclaim a partial list on error.
    fn fill_list(&mut self, depth: usize, head: &mut NodeRef) -> Result<(), Error> {
        let mut previous: Option<NodeIndex> = None;

        loop {
            let Some(token) = self.lexer.next_token()? else {
                return Err(Error::incomplete("input ended inside an open list"));
            };
            if token.is_close_paren() {
                return Ok(());
            }
            if token.class == TokenClass::Whitespace {
                continue;
            }

            let id = self.symbols.insert(&token.text, ())?;

            let index = self.arena.allocate();
            match previous {
                None => *head = NodeRef::Node(index),
                Some(prev) => self.arena.node_mut(prev).right = NodeRef::Node(index),
            }
            previous = Some(index);

            // A nested list begins at its open parenthesis, so put the token
            // back and let the recursive read consume it.
            let element = if token.is_open_paren() {
                self.lexer.push_back();
                self.read_at_depth(depth + 1)?
            } else {
                NodeRef::Atom(id)
            };
            self.arena.node_mut(index).left = element;
        }
    }

    fn next_significant(&mut self) -> Result<Option<Token>, Error> {
        loop {
            match self.lexer.next_token()? {
                Some(token) if token.class == TokenClass::Whitespace => continue,
                other => return Ok(other),
            }
        }
    }

    /// Render a tree to parenthesized, space-separated text.
    ///
    /// Non-destructive: the tree stays live until [`Session::free`] is
    /// called on it.
    pub fn render(&self, root: NodeRef) -> String {
        let mut out = String::new();
        self.write_expr(root, true, &mut out);
        out
    }

    fn write_expr(&self, root: NodeRef, start_list: bool, out: &mut String) {
        match root {
            NodeRef::Empty => out.push_str("() "),
            NodeRef::Atom(id) => {
                match self.symbols.text(id) {
                    Some(text) => out.push_str(text),
                    None => out.push_str(&format!("#<unknown-symbol:{id}>")),
                }
                out.push(' ');
            }
            NodeRef::Node(index) => {
                if start_list {
                    out.push_str("( ");
                }
                let node = *self.arena.node(index);
                self.write_expr(node.left, true, out);
                if node.right == NodeRef::Empty {
                    out.push_str(") ");
                } else {
                    // Continue the same list without reopening a parenthesis
                    self.write_expr(node.right, false, out);
                }
            }
        }
    }

    /// Explicitly return a whole tree to the arena. Printing never frees.
    pub fn free(&mut self, root: NodeRef) {
        self.arena.free(root);
    }

    /// Drive the read/print loop against a host until its input runs out.
    ///
    /// Each cycle: feed a line when the buffer is empty, read one
    /// expression, write its rendering plus a newline, and flush the buffer
    /// once fully consumed. An expression left open at end of input makes
    /// the loop request another line and retry the same expression from the
    /// cached tokens. Any other error ends the session.
    pub fn run(&mut self, host: &mut dyn Host) -> Result<(), Error> {
        loop {
            if self.lexer.buffer_is_empty() {
                let Some(line) = host.read_line() else {
                    return Ok(());
                };
                self.lexer.feed(&line);
                continue;
            }

            let mark = self.lexer.mark();
            match self.read() {
                Ok(root) => {
                    let text = self.render(root);
                    host.write(&text);
                    host.write("\n");
                }
                Err(err) if err.is_incomplete() => {
                    self.lexer.rewind(mark);
                    let Some(line) = host.read_line() else {
                        return Err(err);
                    };
                    self.lexer.feed(&line);
                    continue;
                }
                Err(err) => return Err(err),
            }

            if self.lexer.is_exhausted() {
                self.lexer.flush();
            }
        }
    }
}
