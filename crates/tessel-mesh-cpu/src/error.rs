use thiserror::Error;

/// Contract violations detected while emitting a block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("malformed quad: expected 4 vertices, got {vertices}")]
    MalformedQuad { vertices: usize },
}
