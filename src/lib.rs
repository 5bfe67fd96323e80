//! avprep prepares the two pieces of frame-pipeline setup that sit between a media library
//! and its caller.
//!
//! - Size the planes of a decoded frame buffer from a pixel format descriptor, a height and
//!   line strides ([`resolve_plane_layout`], [`PlaneLayout`]), with every size computation
//!   checked for overflow.
//! - Route textual `name[:specifier]=value` options to the codec, container, scaler and
//!   resampler dictionaries whose schemas declare them ([`OptionRouter`]).
//!
//! Pixel formats and option schemas are read through traits ([`PixelFormatCatalog`],
//! [`OptionSchema`], [`ValidatingSchema`]). The crate ships table-backed implementations with
//! built-in contents that can also be loaded from JSON.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod options;
mod pixfmt;

pub use crate::foundation::core::{
    LineStrides, MAX_BUFFER_SIZE, MAX_PLANES, PALETTE_SIZE, PlaneArray,
};
pub use crate::foundation::error::{AvPrepError, AvPrepResult};
pub use crate::foundation::verbosity::{Verbosity, VerbosityHandle};

pub use crate::pixfmt::catalog::PixelFormatTable;
pub use crate::pixfmt::descriptor::{
    ComponentDescriptor, PixFmtFlag, PixFmtFlags, PixelFormatCatalog, PixelFormatDescriptor,
    PixelFormatId,
};
pub use crate::pixfmt::layout::{PlaneLayout, resolve_plane_layout};
pub use crate::pixfmt::stride::fill_line_strides;

pub use crate::options::catalog::{SchemaCatalog, SchemaSet};
pub use crate::options::dict::{OptionDict, SetMode};
pub use crate::options::router::{OptionRouter, OptionSinks, Routed};
pub use crate::options::schema::{
    OptionKind, OptionSchema, OptionTarget, SearchScope, Subsystem, ValidatingSchema,
};
pub use crate::options::table::{NamedConst, OptionSpec, OptionUsage, SchemaTable, TableContext};
