// Flat syntax tree types for definition templates

use indexmap::IndexMap;

use super::lexer::tokenize;
use crate::error::DefinitionError;
use crate::validation;

/// Placeholder name whose matched span is consumed but never recorded
pub const DISCARD: &str = "_";

/// One extraction result: variable name to filtered value, in capture order
pub type Record = IndexMap<String, String>;

/// Lexical type of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    LeftDelimiter,
    RightDelimiter,
    Variable,
    Pipe,
    Filter,
    EndOfTemplate,
    Error,
}

/// A token is a lexical type plus the source text it covers.
///
/// `Error` tokens carry the failure reason as their literal and
/// `EndOfTemplate` tokens carry an empty literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

/// A tokenized definition: literal fragments and placeholders, ending in
/// exactly one `EndOfTemplate` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    /// Tokenize and validate definition source
    pub fn parse(source: &str) -> Result<Self, DefinitionError> {
        let tokens = tokenize(source)?;
        validation::validate_placeholders(&tokens)?;
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// True when the template holds nothing but its `EndOfTemplate` token
    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    /// Names of all placeholders, discard placeholders included
    pub fn variables(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Variable)
            .map(|token| token.literal.as_str())
            .collect()
    }

    /// Every filter name referenced anywhere in the template
    pub fn filter_names(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Filter)
            .map(|token| token.literal.as_str())
            .collect()
    }

    /// Filters attached to the variable token at `variable_index`, in
    /// declaration order
    pub fn filters_for(&self, variable_index: usize) -> impl Iterator<Item = &str> + '_ {
        self.tokens
            .iter()
            .skip(variable_index + 1)
            .take_while(|token| matches!(token.kind, TokenKind::Pipe | TokenKind::Filter))
            .filter(|token| token.kind == TokenKind::Filter)
            .map(|token| token.literal.as_str())
    }
}
