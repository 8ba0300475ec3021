//! Rasterizer state errors

use thiserror::Error;

/// Operation called while the rasterizer was in the wrong state.
///
/// The rasterizer is left unchanged when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SglError {
    /// `vertex()` or `end()` called outside `begin_triangle_strip()` / `end()`
    #[error("{op} called with no active triangle strip")]
    NoActiveStrip { op: &'static str },
    /// `pop_matrix()` called with nothing pushed
    #[error("pop_matrix called on an empty matrix stack")]
    MatrixStackUnderflow,
}
