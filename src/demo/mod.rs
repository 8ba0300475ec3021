//! Demo scene and its settings
//!
//! The animated flower pattern drawn by the `sgl-demo` binary.

mod flower;
mod settings;

pub use flower::*;
pub use settings::*;
