use smallvec::SmallVec;

use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::foundation::verbosity::{Verbosity, VerbosityHandle};
use crate::options::catalog::SchemaSet;
use crate::options::dict::{OptionDict, SetMode};
use crate::options::schema::{
    OptionKind, OptionSchema, OptionTarget, SearchScope, Subsystem, ValidatingSchema,
};

/// Per-subsystem option dictionaries filled by [`OptionRouter::route`].
///
/// A `None` scaler or resampler sink disables routing to that subsystem.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OptionSinks {
    /// Codec options.
    pub codec: OptionDict,
    /// Container (muxer/demuxer) options.
    pub container: OptionDict,
    /// Scaler options.
    pub scaler: Option<OptionDict>,
    /// Resampler options.
    pub resampler: Option<OptionDict>,
}

impl OptionSinks {
    /// Empty sinks with every subsystem enabled.
    pub fn new() -> Self {
        Self {
            codec: OptionDict::new(),
            container: OptionDict::new(),
            scaler: Some(OptionDict::new()),
            resampler: Some(OptionDict::new()),
        }
    }

    /// Like [`OptionSinks::new`], with the scaler sink seeded with `flags=bicubic`.
    pub fn with_scaler_defaults() -> Self {
        let mut sinks = Self::new();
        if let Some(scaler) = sinks.scaler.as_mut() {
            scaler.set("flags", "bicubic", SetMode::Overwrite);
        }
        sinks
    }

    /// Serialize the sinks as a JSON object of per-subsystem maps.
    pub fn to_json(&self) -> AvPrepResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AvPrepError::serde(format!("serialize option sinks: {e}")))
    }
}

impl Default for OptionSinks {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of routing one option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routed {
    /// Some subsystem consumed the option. Lists the sinks that received it, in routing
    /// order; empty when the option was accepted and dropped.
    Accepted(SmallVec<[Subsystem; 2]>),
    /// No subsystem knows the option.
    NotFound,
}

impl Routed {
    /// True for [`Routed::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Subsystems whose sinks received the value.
    pub fn targets(&self) -> &[Subsystem] {
        match self {
            Self::Accepted(targets) => targets,
            Self::NotFound => &[],
        }
    }
}

/// Routes `name[:specifier]=value` options to the subsystems whose schemas declare them.
///
/// Codec and container are independent: an option both declare goes to both. Scaler and
/// resampler are only consulted for options nothing else took, and their values are
/// validated in a scratch context first.
#[derive(Clone, Debug)]
pub struct OptionRouter<'a> {
    schemas: SchemaSet<'a>,
    verbosity: VerbosityHandle,
}

impl<'a> OptionRouter<'a> {
    /// Router over `schemas`; `debug`/`fdebug` options raise `verbosity`.
    pub fn new(schemas: SchemaSet<'a>, verbosity: VerbosityHandle) -> Self {
        Self { schemas, verbosity }
    }

    /// Verbosity handle this router raises.
    pub fn verbosity(&self) -> &VerbosityHandle {
        &self.verbosity
    }

    /// Route one option into `sinks`.
    pub fn route(&self, name: &str, value: &str, sinks: &mut OptionSinks) -> AvPrepResult<Routed> {
        self.route_with_scaler(name, value, sinks, None)
    }

    /// Route one option, also applying scaler options to `live_scaler` once they pass
    /// scratch validation.
    ///
    /// A rejected scaler or resampler value aborts with [`AvPrepError::InvalidValue`];
    /// codec and container writes made before the rejection are kept.
    #[tracing::instrument(level = "trace", skip(self, sinks, live_scaler))]
    pub fn route_with_scaler(
        &self,
        name: &str,
        value: &str,
        sinks: &mut OptionSinks,
        live_scaler: Option<&mut dyn OptionTarget>,
    ) -> AvPrepResult<Routed> {
        if name == "debug" || name == "fdebug" {
            let previous = self.verbosity.raise_to(Verbosity::Debug);
            tracing::debug!(option = name, ?previous, "verbosity raised to debug");
        }

        let stripped = name.split_once(':').map_or(name, |(head, _)| head);
        let mut targets: SmallVec<[Subsystem; 2]> = SmallVec::new();

        if let Some(kind) = self.find_codec_option(name, stripped) {
            sinks.codec.set(name, value, set_mode(kind));
            tracing::debug!(option = name, ?kind, "routed to codec");
            targets.push(Subsystem::Codec);
        }

        if let Some(kind) = self
            .schemas
            .container
            .find_option(name, SearchScope::WithChildren)
        {
            sinks.container.set(name, value, set_mode(kind));
            if !targets.is_empty() {
                tracing::info!("routing option {name} to both codec and container layer");
            }
            tracing::debug!(option = name, ?kind, "routed to container");
            targets.push(Subsystem::Container);
        }

        let mut consumed = !targets.is_empty();

        if !consumed {
            match (self.schemas.scaler, sinks.scaler.as_mut()) {
                (Some(schema), Some(sink)) => {
                    if let Some(kind) = schema.find_option(name, SearchScope::WithChildren) {
                        validate_in_scratch(schema, Subsystem::Scaler, name, value)?;
                        if let Some(live) = live_scaler {
                            live.set_option(name, value)
                                .map_err(|e| rejected(Subsystem::Scaler, name, e))?;
                        }
                        sink.set(name, value, set_mode(kind));
                        tracing::debug!(option = name, ?kind, "routed to scaler");
                        targets.push(Subsystem::Scaler);
                        consumed = true;
                    }
                }
                (None, _) if name == "sws_flags" => {
                    tracing::warn!("ignoring {name} {value}, scaler is unavailable");
                    consumed = true;
                }
                _ => {}
            }
        }

        if !consumed
            && let (Some(schema), Some(sink)) = (self.schemas.resampler, sinks.resampler.as_mut())
            && let Some(kind) = schema.find_option(name, SearchScope::WithChildren)
        {
            validate_in_scratch(schema, Subsystem::Resampler, name, value)?;
            sink.set(name, value, set_mode(kind));
            tracing::debug!(option = name, ?kind, "routed to resampler");
            targets.push(Subsystem::Resampler);
            consumed = true;
        }

        if consumed {
            Ok(Routed::Accepted(targets))
        } else {
            tracing::debug!(option = name, "no subsystem declares option");
            Ok(Routed::NotFound)
        }
    }

    /// Codec lookup: the stripped name with children, then for `v`/`a`/`s` prefixed names
    /// the unprefixed name at top level.
    fn find_codec_option(&self, name: &str, stripped: &str) -> Option<OptionKind> {
        let codec = self.schemas.codec;
        codec
            .find_option(stripped, SearchScope::WithChildren)
            .or_else(|| {
                let rest = name
                    .strip_prefix('v')
                    .or_else(|| name.strip_prefix('a'))
                    .or_else(|| name.strip_prefix('s'))?;
                codec.find_option(rest, SearchScope::TopLevel)
            })
    }
}

fn set_mode(kind: OptionKind) -> SetMode {
    if kind.accumulates() {
        SetMode::Append
    } else {
        SetMode::Overwrite
    }
}

fn validate_in_scratch(
    schema: &dyn ValidatingSchema,
    subsystem: Subsystem,
    name: &str,
    value: &str,
) -> AvPrepResult<()> {
    let mut scratch = schema.scratch_context();
    let res = scratch.set_option(name, value);
    drop(scratch);
    res.map_err(|e| rejected(subsystem, name, e))
}

fn rejected(subsystem: Subsystem, name: &str, err: AvPrepError) -> AvPrepError {
    let reason = match err {
        AvPrepError::InvalidArgument(msg) => msg,
        AvPrepError::InvalidValue { reason, .. } => reason,
        other => other.to_string(),
    };
    tracing::error!(%subsystem, option = name, %reason, "error setting option");
    AvPrepError::invalid_value(subsystem, name, reason)
}

#[cfg(test)]
#[path = "../../tests/unit/options/router.rs"]
mod tests;
