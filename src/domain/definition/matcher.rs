// Extraction matcher: runs a template over content, left to right, in one pass

use super::ast::{Record, Template, TokenKind, DISCARD};
use super::filters::FilterRegistry;

/// Whitespace the matcher is allowed to skip on either side
pub(crate) fn is_whitespace(ch: char) -> bool {
    ch.is_ascii_whitespace()
}

/// Check whether `content` starts with `literal`, ignoring whitespace on
/// both sides. Returns how many bytes of `content` the match consumed.
///
/// Whitespace left over at the end of `literal` still matches once
/// `content` runs out.
pub fn has_prefix_ignore_whitespace(content: &str, literal: &str) -> Option<usize> {
    let mut content_chars = content.char_indices().peekable();
    let mut literal_chars = literal.chars().peekable();

    while let Some(&expected) = literal_chars.peek() {
        match content_chars.peek() {
            None => {
                return literal_chars.all(is_whitespace).then_some(content.len());
            }
            Some(&(_, actual)) if actual == expected => {
                content_chars.next();
                literal_chars.next();
            }
            Some(&(_, actual)) if is_whitespace(actual) => {
                content_chars.next();
            }
            Some(_) if is_whitespace(expected) => {
                literal_chars.next();
            }
            Some(_) => return None,
        }
    }

    Some(content_chars.peek().map_or(content.len(), |&(offset, _)| offset))
}

// A variable whose value has started but whose closing literal has not
// been seen yet
struct Capture<'t> {
    name: &'t str,
    start: usize,
    token_index: usize,
}

/// Applies templates to content using a fixed filter registry
pub struct Matcher<'r> {
    filters: &'r FilterRegistry,
}

impl<'r> Matcher<'r> {
    pub fn new(filters: &'r FilterRegistry) -> Self {
        Self { filters }
    }

    /// Extract every complete match of `template` from `content`, in the
    /// order they appear. Partial matches at the end of content are dropped.
    pub fn extract(&self, template: &Template, content: &str) -> Vec<Record> {
        let mut records = Vec::new();
        if template.is_empty() {
            return records;
        }

        let tokens = template.tokens();
        let mut cursor = 0;
        let mut index = 0;
        let mut pass_start = 0;
        let mut capture: Option<Capture> = None;
        let mut record = Record::new();

        loop {
            let kind = tokens.get(index).map_or(TokenKind::EndOfTemplate, |t| t.kind);

            match kind {
                TokenKind::Text => {
                    if cursor >= content.len() {
                        break;
                    }
                    let literal = &tokens[index].literal;
                    match has_prefix_ignore_whitespace(&content[cursor..], literal) {
                        Some(consumed) => {
                            if let Some(open) = capture.take() {
                                self.close_capture(template, &open, &content[open.start..cursor], &mut record);
                            }
                            cursor += consumed;
                            index += 1;
                        }
                        // Slide one character and retry the same literal
                        None => cursor += char_len_at(content, cursor),
                    }
                }
                TokenKind::Variable => {
                    capture = Some(Capture {
                        name: &tokens[index].literal,
                        start: cursor,
                        token_index: index,
                    });
                    index += 1;
                }
                TokenKind::LeftDelimiter
                | TokenKind::RightDelimiter
                | TokenKind::Pipe
                | TokenKind::Filter => index += 1,
                TokenKind::EndOfTemplate | TokenKind::Error => {
                    records.push(std::mem::take(&mut record));
                    capture = None;
                    index = 0;

                    // A pass that consumed nothing would repeat forever
                    if cursor == pass_start {
                        cursor += char_len_at(content, cursor);
                    }
                    if cursor >= content.len() {
                        break;
                    }
                    pass_start = cursor;
                }
            }
        }

        tracing::debug!(
            records = records.len(),
            content_len = content.len(),
            "definition matched content"
        );
        records
    }

    fn close_capture(&self, template: &Template, capture: &Capture, raw: &str, record: &mut Record) {
        if capture.name == DISCARD {
            return;
        }
        let value = self
            .filters
            .apply_chain(raw, template.filters_for(capture.token_index));
        record.insert(capture.name.to_string(), value);
    }
}

fn char_len_at(content: &str, offset: usize) -> usize {
    content[offset..].chars().next().map_or(1, char::len_utf8)
}
