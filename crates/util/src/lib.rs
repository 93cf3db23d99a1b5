//! Small helpers shared across the wfscript crates.

pub mod path_processing;
pub mod text_processing;

pub use path_processing::expand_tilde;
pub use text_processing::{is_blank, non_blank};
