//! Human-readable and JSON renderings of sweep results.
mod json;
mod progress;
mod text;


pub use json::{RunDocument, export_json, render_json};
pub use progress::LogObserver;
pub use text::TextReport;
