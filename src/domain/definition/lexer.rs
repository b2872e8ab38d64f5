// Definition tokenizer: an explicit state machine over the source text

use super::ast::{Token, TokenKind};
use crate::error::DefinitionError;

pub const LEFT_DELIMITER: &str = "{{";
pub const RIGHT_DELIMITER: &str = "}}";
pub const PIPE: char = '|';

/// Scanner states. Each state consumes some input, emits tokens and names
/// the state that follows it; `None` ends the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Text,
    LeftDelimiter,
    Variable,
    Pipe,
    Filter,
    RightDelimiter,
}

pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Scan the whole source. The result always ends in exactly one
    /// `EndOfTemplate` or `Error` token.
    pub fn run(mut self) -> Vec<Token> {
        self.scan();
        self.tokens
    }

    fn scan(&mut self) {
        let mut state = Some(LexState::Text);
        while let Some(current) = state {
            state = match current {
                LexState::Text => self.lex_text(),
                LexState::LeftDelimiter => self.lex_delimiter(LEFT_DELIMITER, TokenKind::LeftDelimiter, LexState::Variable),
                LexState::Variable => self.lex_identifier(TokenKind::Variable),
                LexState::Pipe => self.lex_pipe(),
                LexState::Filter => self.lex_identifier(TokenKind::Filter),
                LexState::RightDelimiter => self.lex_delimiter(RIGHT_DELIMITER, TokenKind::RightDelimiter, LexState::Text),
            };
        }
    }

    fn lex_text(&mut self) -> Option<LexState> {
        match self.rest().find(LEFT_DELIMITER) {
            Some(offset) => {
                self.pos += offset;
                self.emit_if_nonempty(TokenKind::Text);
                Some(LexState::LeftDelimiter)
            }
            None => {
                self.pos = self.source.len();
                self.emit_if_nonempty(TokenKind::Text);
                self.emit(TokenKind::EndOfTemplate);
                None
            }
        }
    }

    fn lex_delimiter(&mut self, delimiter: &str, kind: TokenKind, next: LexState) -> Option<LexState> {
        self.pos += delimiter.len();
        self.emit(kind);
        Some(next)
    }

    fn lex_pipe(&mut self) -> Option<LexState> {
        self.pos += PIPE.len_utf8();
        self.emit(TokenKind::Pipe);
        Some(LexState::Filter)
    }

    // Variables and filters share one scanning rule: run to the closer or a
    // pipe, rejecting whitespace and end of input on the way.
    fn lex_identifier(&mut self, kind: TokenKind) -> Option<LexState> {
        loop {
            let rest = self.rest();
            if rest.starts_with(RIGHT_DELIMITER) {
                return self.finish_identifier(kind, LexState::RightDelimiter);
            }
            match rest.chars().next() {
                None => return self.fail("unclosed placeholder, expected '}}'"),
                Some(PIPE) => return self.finish_identifier(kind, LexState::Pipe),
                Some(ch) if ch.is_whitespace() => {
                    return self.fail(&format!("whitespace {:?} inside placeholder", ch))
                }
                Some(ch) => self.pos += ch.len_utf8(),
            }
        }
    }

    fn finish_identifier(&mut self, kind: TokenKind, next: LexState) -> Option<LexState> {
        if self.pos == self.start {
            let what = if kind == TokenKind::Filter { "filter" } else { "variable" };
            return self.fail(&format!("empty {} name", what));
        }
        self.emit(kind);
        Some(next)
    }

    fn fail(&mut self, reason: &str) -> Option<LexState> {
        tracing::debug!(position = self.pos, reason, "definition tokenization failed");
        self.tokens.push(Token::new(TokenKind::Error, reason));
        None
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn emit(&mut self, kind: TokenKind) {
        self.tokens
            .push(Token::new(kind, &self.source[self.start..self.pos]));
        self.start = self.pos;
    }

    fn emit_if_nonempty(&mut self, kind: TokenKind) {
        if self.pos > self.start {
            self.emit(kind);
        }
    }
}

/// Tokenize definition source, turning a trailing `Error` token into a
/// `DefinitionError::Tokenize`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DefinitionError> {
    let mut lexer = Lexer::new(source);
    lexer.scan();

    match lexer.tokens.last() {
        Some(token) if token.kind == TokenKind::Error => Err(DefinitionError::Tokenize {
            position: lexer.pos,
            reason: token.literal.clone(),
        }),
        _ => Ok(lexer.tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn tokens(expected: &[(TokenKind, &str)]) -> Vec<Token> {
        expected.iter().map(|(kind, literal)| Token::new(*kind, *literal)).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize("").unwrap(), tokens(&[(EndOfTemplate, "")]));
    }

    #[test]
    fn test_tokenize_text_only() {
        assert_eq!(
            tokenize("text only").unwrap(),
            tokens(&[(Text, "text only"), (EndOfTemplate, "")])
        );
    }

    #[test]
    fn test_tokenize_anchor() {
        assert_eq!(
            tokenize(r#"<a href="{{someLink}}">{{someLinkText}}</a>"#).unwrap(),
            tokens(&[
                (Text, r#"<a href=""#),
                (LeftDelimiter, "{{"),
                (Variable, "someLink"),
                (RightDelimiter, "}}"),
                (Text, r#"">"#),
                (LeftDelimiter, "{{"),
                (Variable, "someLinkText"),
                (RightDelimiter, "}}"),
                (Text, "</a>"),
                (EndOfTemplate, ""),
            ])
        );
    }

    #[test]
    fn test_tokenize_filters() {
        assert_eq!(
            tokenize(r#"<a href="{{someLink|filter1|filter2}}">{{someLinkText|filter3}}</a>"#).unwrap(),
            tokens(&[
                (Text, r#"<a href=""#),
                (LeftDelimiter, "{{"),
                (Variable, "someLink"),
                (Pipe, "|"),
                (Filter, "filter1"),
                (Pipe, "|"),
                (Filter, "filter2"),
                (RightDelimiter, "}}"),
                (Text, r#"">"#),
                (LeftDelimiter, "{{"),
                (Variable, "someLinkText"),
                (Pipe, "|"),
                (Filter, "filter3"),
                (RightDelimiter, "}}"),
                (Text, "</a>"),
                (EndOfTemplate, ""),
            ])
        );
    }

    #[test]
    fn test_tokenize_placeholder_at_start_and_end() {
        assert_eq!(
            tokenize("{{a}}-{{b}}").unwrap(),
            tokens(&[
                (LeftDelimiter, "{{"),
                (Variable, "a"),
                (RightDelimiter, "}}"),
                (Text, "-"),
                (LeftDelimiter, "{{"),
                (Variable, "b"),
                (RightDelimiter, "}}"),
                (EndOfTemplate, ""),
            ])
        );
    }

    #[test]
    fn test_tokenize_keeps_whitespace_in_text() {
        let result = tokenize("<li>\n  {{item}}\n</li>\n").unwrap();
        assert_eq!(result[0], Token::new(Text, "<li>\n  "));
        assert_eq!(result[4], Token::new(Text, "\n</li>\n"));
    }

    #[test]
    fn test_tokenize_single_brace_is_text() {
        assert_eq!(
            tokenize("a { b } c").unwrap(),
            tokens(&[(Text, "a { b } c"), (EndOfTemplate, "")])
        );
    }

    #[test]
    fn test_tokenize_multibyte_text() {
        let result = tokenize("£{{price|pence}}€").unwrap();
        assert_eq!(result[0], Token::new(Text, "£"));
        assert_eq!(result[6], Token::new(Text, "€"));
    }

    #[test]
    fn test_space_in_variable_fails() {
        let err = tokenize("<a>{{some link}}</a>").unwrap_err();
        match err {
            DefinitionError::Tokenize { position, reason } => {
                assert_eq!(position, 9);
                assert!(reason.contains("whitespace"));
            }
            other => panic!("Expected tokenize error, got {:?}", other),
        }
    }

    #[test]
    fn test_newline_in_filter_fails() {
        assert!(tokenize("<a>{{link|trim\n}}</a>").is_err());
    }

    #[test]
    fn test_unclosed_placeholder_fails() {
        let err = tokenize("<a>{{link").unwrap_err();
        assert!(err.to_string().contains("unclosed placeholder"));
    }

    #[test]
    fn test_unclosed_filter_fails() {
        assert!(tokenize("<a>{{link|trim").is_err());
        assert!(tokenize("<a>{{").is_err());
    }

    #[test]
    fn test_empty_names_fail() {
        assert!(tokenize("{{}}").unwrap_err().to_string().contains("empty variable name"));
        assert!(tokenize("{{|trim}}").is_err());
        assert!(tokenize("{{x||trim}}").unwrap_err().to_string().contains("empty filter name"));
        assert!(tokenize("{{x|}}").is_err());
    }

    #[test]
    fn test_run_ends_with_error_token() {
        let result = Lexer::new("ok {{bad name}}").run();
        assert_eq!(result.last().unwrap().kind, Error);
        assert_eq!(result.iter().filter(|t| t.kind == Error).count(), 1);
    }

    #[test]
    fn test_run_ends_with_single_end_token() {
        let result = Lexer::new("<p>{{x}}</p>").run();
        assert_eq!(result.last().unwrap().kind, EndOfTemplate);
        assert_eq!(result.iter().filter(|t| t.kind == EndOfTemplate).count(), 1);
    }
}
