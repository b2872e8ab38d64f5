pub mod settings;

pub use settings::{OutputFormat, ReaderKind, ScraperSettings};
