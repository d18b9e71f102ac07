use thiserror::Error;

/// Rejected brush configuration. The previous valid value stays in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintError {
    #[error("Invalid brush size: {0} (must be a finite number > 0)")]
    InvalidSize(f32),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
}

/// Check a brush size, returning it unchanged when valid
pub fn validate_size(size: f32) -> Result<f32, PaintError> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(PaintError::InvalidSize(size))
    }
}
