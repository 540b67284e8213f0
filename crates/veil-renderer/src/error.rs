use crate::gl::ShaderStage;

/// Errors raised by the GPU state layer.
///
/// Every variant is a caller or driver fault reported synchronously; nothing
/// in the renderer retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} {value} exceeds maximum index {}", .limit.saturating_sub(1))]
    OutOfRange {
        what: &'static str,
        value: u32,
        limit: u32,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("program link failed: {0}")]
    LinkError(String),

    #[error("{stage} shader compilation failed: {log}")]
    CompileError { stage: ShaderStage, log: String },

    #[error("driver error: {0}")]
    Driver(String),
}

pub type GlResult<T> = Result<T, GlError>;
