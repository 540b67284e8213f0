pub mod errors;
pub mod hash;
pub mod types;

pub use errors::{ConfigError, VeilError};
pub use hash::crc32;
pub use types::{Color, Rect2D, Size2D};

pub type Result<T> = std::result::Result<T, VeilError>;
