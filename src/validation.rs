// Validation functions for scrapedef
// Template checks that run before any matching, and input checks for fetches

use anyhow::{bail, Context, Result};
use url::Url;

use crate::domain::definition::{Token, TokenKind};
use crate::error::DefinitionError;

/// Every placeholder needs literal text after it to mark where its value
/// ends. Whitespace-only text does not count, since the matcher skips it.
///
/// Rejects two placeholders with nothing between them, and a placeholder
/// with nothing after it.
pub fn validate_placeholders(tokens: &[Token]) -> Result<(), DefinitionError> {
    let mut open: Option<&str> = None;

    for token in tokens {
        match token.kind {
            TokenKind::Variable => {
                if let Some(first) = open {
                    return Err(DefinitionError::AdjacentPlaceholders {
                        first: first.to_string(),
                        second: token.literal.clone(),
                    });
                }
                open = Some(&token.literal);
            }
            TokenKind::Text if !is_blank(&token.literal) => open = None,
            TokenKind::EndOfTemplate => {
                if let Some(name) = open {
                    return Err(DefinitionError::UnboundedPlaceholder {
                        name: name.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn is_blank(literal: &str) -> bool {
    literal.chars().all(crate::domain::definition::is_whitespace)
}

/// Parse a location as a URL with a safe scheme (http or https only)
pub fn validate_url(location: &str) -> Result<Url> {
    let url = Url::parse(location.trim())
        .with_context(|| format!("Invalid URL '{}'", location))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!(
            "Only http:// and https:// URLs are allowed, got '{}://'",
            other
        ),
    }
}
