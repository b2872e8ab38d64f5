// Presenters - turn parsed pages into printable text

use anyhow::Result;

use crate::config::OutputFormat;
use crate::services::pipeline::Parsed;

/// Strategy trait for output formats
pub trait Presenter: Send + Sync {
    fn present(&self, parsed: &Parsed) -> Result<String>;
}

/// One `field: value` line per field, a blank line after each record
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present(&self, parsed: &Parsed) -> Result<String> {
        let mut out = String::new();
        for record in &parsed.records {
            for (field, value) in record {
                out.push_str(field);
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        Ok(out)
    }
}

pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn present(&self, parsed: &Parsed) -> Result<String> {
        Ok(serde_json::to_string_pretty(parsed)?)
    }
}

pub fn presenter_for(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Text => Box::new(TextPresenter),
        OutputFormat::Json => Box::new(JsonPresenter),
    }
}
