pub mod common;
pub mod prompt;
pub mod text;

pub use common::*;
pub use prompt::*;
pub use text::*;
