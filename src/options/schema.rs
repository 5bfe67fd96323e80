use std::fmt;

use crate::foundation::error::AvPrepResult;

/// Subsystems an option can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Video/audio/subtitle codec layer.
    Codec,
    /// Demuxer/muxer layer.
    Container,
    /// Image scaler.
    Scaler,
    /// Audio resampler.
    Resampler,
}

impl Subsystem {
    /// Lower-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Codec => "codec",
            Self::Container => "container",
            Self::Scaler => "scaler",
            Self::Resampler => "resampler",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kind of a schema option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Bitmask built from named flags; repeated values accumulate.
    Flags,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Int64,
    /// Double precision float.
    Double,
    /// Single precision float.
    Float,
    /// Boolean.
    Bool,
    /// Free-form string.
    String,
    /// `num/den` or `num:den` rational.
    Rational,
    /// `WxH` image size.
    ImageSize,
    /// Pixel format name or number.
    PixelFmt,
    /// Sample format name or number.
    SampleFmt,
    /// Duration in seconds or `[-][HH:]MM:SS[.m...]`.
    Duration,
}

impl OptionKind {
    /// True when repeated values for the same key are appended rather than replaced.
    pub fn accumulates(self) -> bool {
        matches!(self, Self::Flags)
    }
}

/// How far a schema lookup reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// Only the subsystem's own options.
    TopLevel,
    /// The subsystem's options and those of its children (private codec/format options).
    WithChildren,
}

/// Read-only option schema of one subsystem.
pub trait OptionSchema {
    /// Kind of the option called `name`, or `None` when the subsystem does not expose it.
    fn find_option(&self, name: &str, scope: SearchScope) -> Option<OptionKind>;
}

/// Anything options can be applied to: scratch validation contexts and live subsystem
/// configuration objects.
pub trait OptionTarget {
    /// Apply `value` to the option called `name`, rejecting illegal values.
    fn set_option(&mut self, name: &str, value: &str) -> AvPrepResult<()>;
}

/// Schema of a subsystem that can build disposable contexts for validating values.
pub trait ValidatingSchema: OptionSchema {
    /// Fresh context with default settings. Dropping it releases everything it holds.
    fn scratch_context(&self) -> Box<dyn OptionTarget + '_>;
}
