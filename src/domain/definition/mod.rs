// Definition module: reverse templates for pulling records out of markup
//
// A definition is the reverse of a template. Literal text must appear in the
// content (whitespace aside), and `{{name|filter|...}}` placeholders capture
// whatever sits between two literals. The definition is treated as a
// repeating block, so one page yields a list of records.

mod ast;
mod filters;
mod lexer;
mod matcher;
mod parser;

pub use ast::{Record, Template, Token, TokenKind, DISCARD};
pub use filters::{
    FilterOperation, FilterRegistry, FilterRegistryBuilder, FnFilter, LowercaseOp, PenceOp,
    RespaceOp, TrimOp, UnescapeOp, UppercaseOp, UNESCAPE_ERROR,
};
pub use lexer::{tokenize, Lexer, LEFT_DELIMITER, PIPE, RIGHT_DELIMITER};
pub use matcher::{has_prefix_ignore_whitespace, Matcher};
pub use parser::{Definition, DefinitionParser};

pub(crate) use matcher::is_whitespace;
