use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::options::dict::{OptionDict, SetMode};
use crate::options::schema::{
    OptionKind, OptionSchema, OptionTarget, SearchScope, ValidatingSchema,
};
use crate::options::value::validate_value;

/// Contexts an option applies in. An option with no usage at all is internal to its
/// subsystem and never matched by lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionUsage {
    /// Used when encoding or muxing.
    Encoding,
    /// Used when decoding or demuxing.
    Decoding,
    /// Video streams.
    Video,
    /// Audio streams.
    Audio,
    /// Subtitle streams.
    Subtitle,
    /// Filtering (scaler, resampler).
    Filtering,
}

/// Named value accepted by an option (`bicubic`, `auto`, ...).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NamedConst {
    /// Constant name.
    pub name: String,
    /// Numeric value (a bit for flags options).
    pub value: i64,
}

fn default_usage() -> Vec<OptionUsage> {
    vec![OptionUsage::Encoding, OptionUsage::Decoding]
}

/// One option declared by a [`SchemaTable`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptionSpec {
    /// Option name.
    pub name: String,
    /// Value kind.
    pub kind: OptionKind,
    /// Inclusive lower bound for numeric kinds (microseconds for durations).
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric kinds (microseconds for durations).
    #[serde(default)]
    pub max: Option<f64>,
    /// Named values.
    #[serde(default)]
    pub constants: Vec<NamedConst>,
    /// Where the option applies; empty means internal.
    #[serde(default = "default_usage")]
    pub usage: Vec<OptionUsage>,
}

impl OptionSpec {
    /// Option usable for encoding and decoding, without bounds or constants.
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            min: None,
            max: None,
            constants: Vec::new(),
            usage: default_usage(),
        }
    }

    /// Set inclusive bounds.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Add named values, in order.
    pub fn constants(mut self, consts: &[(&str, i64)]) -> Self {
        self.constants.extend(consts.iter().map(|(name, value)| NamedConst {
            name: (*name).to_owned(),
            value: *value,
        }));
        self
    }

    /// Replace the usage contexts.
    pub fn usage(mut self, usage: &[OptionUsage]) -> Self {
        self.usage = usage.to_vec();
        self
    }

    /// Mark the option internal: declared, but never matched by lookups.
    pub fn hidden(self) -> Self {
        self.usage(&[])
    }

    /// True when lookups may match this option.
    pub fn is_visible(&self) -> bool {
        !self.usage.is_empty()
    }

    /// Value of the named constant `name`.
    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }
}

/// Table-backed option schema: a named option list plus child schemas (private codec or
/// format options).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SchemaTable {
    /// Class name, e.g. `AVCodecContext`.
    pub name: String,
    /// Options declared at this level.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Child schemas searched by [`SearchScope::WithChildren`] lookups.
    #[serde(default)]
    pub children: Vec<SchemaTable>,
}

impl SchemaTable {
    /// Empty table named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an option.
    pub fn with_option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    /// Add a child schema.
    pub fn with_child(mut self, child: SchemaTable) -> Self {
        self.children.push(child);
        self
    }

    /// First option named `name`, own options before children, visible or not.
    pub fn lookup(&self, name: &str, scope: SearchScope) -> Option<&OptionSpec> {
        if let Some(spec) = self.options.iter().find(|o| o.name == name) {
            return Some(spec);
        }
        match scope {
            SearchScope::TopLevel => None,
            SearchScope::WithChildren => self.children.iter().find_map(|c| c.lookup(name, scope)),
        }
    }

    /// Context that validates and records values against this table.
    pub fn context(&self) -> TableContext<'_> {
        TableContext {
            schema: self,
            applied: OptionDict::new(),
        }
    }

    /// Check option names are unique per level and bounds are ordered.
    pub fn validate(&self) -> AvPrepResult<()> {
        for (i, opt) in self.options.iter().enumerate() {
            if opt.name.is_empty() {
                return Err(AvPrepError::invalid_argument(format!(
                    "schema '{}' declares an option without a name",
                    self.name
                )));
            }
            if self.options[..i].iter().any(|o| o.name == opt.name) {
                return Err(AvPrepError::invalid_argument(format!(
                    "schema '{}' declares option '{}' twice",
                    self.name, opt.name
                )));
            }
            if let (Some(min), Some(max)) = (opt.min, opt.max)
                && min > max
            {
                return Err(AvPrepError::invalid_argument(format!(
                    "schema '{}' option '{}' has min {min} above max {max}",
                    self.name, opt.name
                )));
            }
        }
        self.children.iter().try_for_each(SchemaTable::validate)
    }
}

impl OptionSchema for SchemaTable {
    fn find_option(&self, name: &str, scope: SearchScope) -> Option<OptionKind> {
        self.lookup(name, scope)
            .filter(|spec| spec.is_visible())
            .map(|spec| spec.kind)
    }
}

impl ValidatingSchema for SchemaTable {
    fn scratch_context(&self) -> Box<dyn OptionTarget + '_> {
        Box::new(self.context())
    }
}

/// Option context backed by a [`SchemaTable`]: values are checked against the declared
/// kind, bounds and constants, and accepted values are recorded.
#[derive(Debug)]
pub struct TableContext<'a> {
    schema: &'a SchemaTable,
    applied: OptionDict,
}

impl TableContext<'_> {
    /// Values accepted so far. Flags values accumulate.
    pub fn applied(&self) -> &OptionDict {
        &self.applied
    }
}

impl OptionTarget for TableContext<'_> {
    fn set_option(&mut self, name: &str, value: &str) -> AvPrepResult<()> {
        let Some(spec) = self.schema.lookup(name, SearchScope::WithChildren) else {
            return Err(AvPrepError::invalid_argument(format!(
                "'{}' has no option '{name}'",
                self.schema.name
            )));
        };
        validate_value(spec, value).map_err(AvPrepError::invalid_argument)?;
        let mode = if spec.kind.accumulates() {
            SetMode::Append
        } else {
            SetMode::Overwrite
        };
        self.applied.set(name, value, mode);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/options/table.rs"]
mod tests;
