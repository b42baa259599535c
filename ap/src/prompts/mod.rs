//! Prompt templates
//!
//! Handlebars templates with embedded defaults and `.pmt` file overrides.

mod embedded;
mod loader;

pub use embedded::get_embedded;
pub use loader::{PromptLoader, RoadmapContext};
