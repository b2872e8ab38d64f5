pub mod input;
pub mod pipeline;
pub mod presenter;
pub mod reader;

pub use pipeline::{Parsed, Pipeline, PipelineOutput};
pub use presenter::{presenter_for, JsonPresenter, Presenter, TextPresenter};
pub use reader::{reader_for, CacheReader, FileReader, HttpReader, WebReader};
