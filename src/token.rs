//! Token model for the lexer. A token is the text of one maximal run of
//! characters plus the class its leading character selected. Tokens are
//! immutable once produced.

/// Characters that form single-character operator tokens
pub const OPERATOR_CHARS: &str = "+-*/%=><";

/// Reserved words classified as keywords rather than variables
pub const KEYWORDS: [&str; 4] = ["define", "lambda", "if", "cond"];

/// Token classes, decided by the leading character of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Whitespace,
    /// A single `(` or `)`; open and close are distinguished by text
    Parenthesis,
    /// A run of ASCII digits
    Number,
    /// One character out of [`OPERATOR_CHARS`]
    Operator,
    Keyword,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
}

impl Token {
    pub fn new(text: impl Into<String>, class: TokenClass) -> Self {
        Token {
            text: text.into(),
            class,
        }
    }

    /// Classify a letter/digit/`_`/`-` run as keyword or variable
    pub(crate) fn word(text: &str) -> Self {
        let class = if KEYWORDS.contains(&text) {
            TokenClass::Keyword
        } else {
            TokenClass::Variable
        };
        Token::new(text, class)
    }

    pub fn is_open_paren(&self) -> bool {
        self.class == TokenClass::Parenthesis && self.text == "("
    }

    pub fn is_close_paren(&self) -> bool {
        self.class == TokenClass::Parenthesis && self.text == ")"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_classification() {
        let cases = vec![
            ("define", TokenClass::Keyword),
            ("lambda", TokenClass::Keyword),
            ("if", TokenClass::Keyword),
            ("cond", TokenClass::Keyword),
            ("defined", TokenClass::Variable),
            ("x", TokenClass::Variable),
            ("list-ref", TokenClass::Variable),
            ("snake_case", TokenClass::Variable),
        ];
        for (text, expected) in cases {
            assert_eq!(Token::word(text).class, expected, "word '{text}'");
        }
    }

    #[test]
    fn test_paren_predicates() {
        let open = Token::new("(", TokenClass::Parenthesis);
        let close = Token::new(")", TokenClass::Parenthesis);
        assert!(open.is_open_paren() && !open.is_close_paren());
        assert!(close.is_close_paren() && !close.is_open_paren());
        // Same text under another class is not a parenthesis token
        assert!(!Token::new("(", TokenClass::Variable).is_open_paren());
    }
}
