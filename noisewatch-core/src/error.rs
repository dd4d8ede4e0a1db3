use thiserror::Error;

/// Validation failures for report input.
///
/// Every variant maps to a 4xx-equivalent rejection: the caller must fix the
/// input and resubmit, automatic retries are never appropriate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("mediaType must be \"audio\" or \"video\", got \"{0}\"")]
    InvalidMediaType(String),

    #[error("comment exceeds {max} characters (got {len})")]
    CommentTooLong { len: usize, max: usize },

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
