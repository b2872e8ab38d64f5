// Error handling for scrapedef

use std::fmt;

/// Errors raised while building a definition template
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// The definition source breaks the placeholder grammar
    Tokenize { position: usize, reason: String },
    /// Two placeholders with no literal text between them
    AdjacentPlaceholders { first: String, second: String },
    /// A placeholder with no literal text after it
    UnboundedPlaceholder { name: String },
    /// The definition file could not be read
    Io(String),
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::Tokenize { position, reason } => {
                write!(f, "Tokenization error at position {}: {}", position, reason)
            }
            DefinitionError::AdjacentPlaceholders { first, second } => write!(
                f,
                "Placeholders '{}' and '{}' need literal text between them",
                first, second
            ),
            DefinitionError::UnboundedPlaceholder { name } => write!(
                f,
                "Placeholder '{}' must be followed by literal text",
                name
            ),
            DefinitionError::Io(msg) => write!(f, "Error opening definition file: {}", msg),
        }
    }
}

impl std::error::Error for DefinitionError {}
