// scrapedef: pull repeated records out of web pages with reverse templates

pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod validation;

pub use domain::definition::{Definition, DefinitionParser, FilterRegistry, Record, Template};
pub use error::DefinitionError;
