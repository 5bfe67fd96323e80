use crate::options::schema::Subsystem;

/// Convenience result type used across avprep.
pub type AvPrepResult<T> = Result<T, AvPrepError>;

/// Error taxonomy shared by the layout resolver and the option router.
#[derive(thiserror::Error, Debug)]
pub enum AvPrepError {
    /// Input that can never describe a linear frame buffer (zero height, unknown or
    /// hardware-only pixel format, undersized buffer).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A guarded size computation would leave the representable buffer range.
    #[error("overflow: {0}")]
    Overflow(String),

    /// A subsystem rejected an option value while it was being validated.
    #[error("invalid value for {subsystem} option '{name}': {reason}")]
    InvalidValue {
        /// Subsystem whose context rejected the value.
        subsystem: Subsystem,
        /// Option name as passed to the router, specifier included.
        name: String,
        /// Rejection reason reported by the context.
        reason: String,
    },

    /// Errors when deserializing catalogs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvPrepError {
    /// Build a [`AvPrepError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`AvPrepError::Overflow`] value.
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// Build a [`AvPrepError::InvalidValue`] value.
    pub fn invalid_value(
        subsystem: Subsystem,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            subsystem,
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AvPrepError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
