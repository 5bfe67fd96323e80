use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::level_filters::LevelFilter;

/// Log verbosity levels, ordered from quietest to noisiest.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Verbosity {
    /// Nothing is logged.
    Quiet = 0,
    /// Errors only.
    Error = 1,
    /// Errors and warnings.
    Warning = 2,
    /// Informational messages (the default).
    #[default]
    Info = 3,
    /// Extra detail that is still meant for users.
    Verbose = 4,
    /// Developer diagnostics.
    Debug = 5,
    /// Everything.
    Trace = 6,
}

impl Verbosity {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Quiet,
            1 => Self::Error,
            2 => Self::Warning,
            3 => Self::Info,
            4 => Self::Verbose,
            5 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// The `tracing` filter a subscriber should use for this verbosity.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warning => LevelFilter::WARN,
            Self::Info | Self::Verbose => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Shared, cloneable handle to a process- or session-wide log verbosity.
///
/// Clones observe the same level. Embedders that install a `tracing` subscriber can
/// consult [`VerbosityHandle::level_filter`] to decide what to emit.
#[derive(Clone, Debug)]
pub struct VerbosityHandle {
    level: Arc<AtomicU8>,
}

impl VerbosityHandle {
    /// Create a handle starting at `level`.
    pub fn new(level: Verbosity) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    /// Current level.
    pub fn level(&self) -> Verbosity {
        Verbosity::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Replace the current level.
    pub fn set(&self, level: Verbosity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Raise the level to at least `level`, never lowering it. Returns the previous level.
    pub fn raise_to(&self, level: Verbosity) -> Verbosity {
        Verbosity::from_u8(self.level.fetch_max(level as u8, Ordering::Relaxed))
    }

    /// `tracing` filter matching the current level.
    pub fn level_filter(&self) -> LevelFilter {
        self.level().level_filter()
    }
}

impl Default for VerbosityHandle {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/verbosity.rs"]
mod tests;
