//! Bundle-level plugins.

mod comments;
mod postprocess;

pub use comments::strip_comments;
pub use postprocess::{PostProcessOptions, PostProcessPlugin, post_process};
