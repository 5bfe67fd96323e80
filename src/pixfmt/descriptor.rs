use std::fmt;

use crate::foundation::core::MAX_PLANES;
use crate::foundation::error::{AvPrepError, AvPrepResult};

/// Identifier of a pixel format inside a [`PixelFormatCatalog`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PixelFormatId(pub i32);

impl PixelFormatId {
    /// "No format" sentinel. Never present in a catalog.
    pub const NONE: Self = Self(-1);
}

impl fmt::Display for PixelFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single descriptor flag, as spelled in JSON catalogs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixFmtFlag {
    /// Big-endian samples.
    Be,
    /// Pixel values index a 256-entry palette carried as plane 1.
    Pal,
    /// Samples are packed bitwise (1bpp and friends).
    Bitstream,
    /// Opaque hardware surface; no linear byte layout.
    Hwaccel,
    /// At least one component lives on its own plane.
    Planar,
    /// RGB-like components rather than YUV.
    Rgb,
    /// Fixed palette that is still carried alongside the pixel data.
    PseudoPal,
    /// Has an alpha component.
    Alpha,
    /// Bayer-pattern raw sensor data.
    Bayer,
    /// Floating point samples.
    Float,
}

impl PixFmtFlag {
    const ALL: [Self; 10] = [
        Self::Be,
        Self::Pal,
        Self::Bitstream,
        Self::Hwaccel,
        Self::Planar,
        Self::Rgb,
        Self::PseudoPal,
        Self::Alpha,
        Self::Bayer,
        Self::Float,
    ];

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Be => "be",
            Self::Pal => "pal",
            Self::Bitstream => "bitstream",
            Self::Hwaccel => "hwaccel",
            Self::Planar => "planar",
            Self::Rgb => "rgb",
            Self::PseudoPal => "pseudo_pal",
            Self::Alpha => "alpha",
            Self::Bayer => "bayer",
            Self::Float => "float",
        }
    }
}

bitflags::bitflags! {
    /// Bitset of [`PixFmtFlag`]s. Bit positions follow libavutil's `AV_PIX_FMT_FLAG_*`.
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(from = "Vec<PixFmtFlag>", into = "Vec<PixFmtFlag>")]
    pub struct PixFmtFlags: u32 {
        /// Big-endian samples.
        const BE = PixFmtFlag::Be.bit();
        /// Palette in plane 1.
        const PAL = PixFmtFlag::Pal.bit();
        /// Bitwise-packed samples.
        const BITSTREAM = PixFmtFlag::Bitstream.bit();
        /// Hardware surface.
        const HWACCEL = PixFmtFlag::Hwaccel.bit();
        /// Planar layout.
        const PLANAR = PixFmtFlag::Planar.bit();
        /// RGB-like components.
        const RGB = PixFmtFlag::Rgb.bit();
        /// Fixed palette carried with the data.
        const PSEUDO_PAL = PixFmtFlag::PseudoPal.bit();
        /// Has alpha.
        const ALPHA = PixFmtFlag::Alpha.bit();
        /// Bayer pattern.
        const BAYER = PixFmtFlag::Bayer.bit();
        /// Floating point samples.
        const FLOAT = PixFmtFlag::Float.bit();
    }
}

impl PixFmtFlags {
    fn named(self) -> impl Iterator<Item = PixFmtFlag> {
        PixFmtFlag::ALL
            .into_iter()
            .filter(move |f| self.bits() & f.bit() != 0)
    }
}

impl From<PixFmtFlag> for PixFmtFlags {
    fn from(flag: PixFmtFlag) -> Self {
        Self::from_bits_retain(flag.bit())
    }
}

impl From<Vec<PixFmtFlag>> for PixFmtFlags {
    fn from(flags: Vec<PixFmtFlag>) -> Self {
        flags
            .into_iter()
            .fold(Self::empty(), |acc, f| acc | Self::from(f))
    }
}

impl From<PixFmtFlags> for Vec<PixFmtFlag> {
    fn from(flags: PixFmtFlags) -> Self {
        flags.named().collect()
    }
}

impl fmt::Debug for PixFmtFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.named().map(PixFmtFlag::name).collect();
        write!(f, "PixFmtFlags({})", names.join(" | "))
    }
}

fn default_step() -> u8 {
    1
}

fn default_depth() -> u8 {
    8
}

/// Placement of one color or alpha component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComponentDescriptor {
    /// Physical plane holding the component (0..=3).
    pub plane: u8,
    /// Distance between two horizontally adjacent samples, in bytes (bits for bitstream
    /// formats).
    #[serde(default = "default_step")]
    pub step: u8,
    /// Offset of the first sample inside a pixel step.
    #[serde(default)]
    pub offset: u8,
    /// Significant bits per sample.
    #[serde(default = "default_depth")]
    pub depth: u8,
}

/// Read-only description of a pixel format's memory layout.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelFormatDescriptor {
    /// Catalog identifier.
    pub id: PixelFormatId,
    /// Canonical lower-case name, e.g. `yuv420p`.
    pub name: String,
    /// Descriptor flags.
    #[serde(default)]
    pub flags: PixFmtFlags,
    /// Horizontal chroma subsampling as a power-of-two shift (planes 1 and 2).
    #[serde(default)]
    pub log2_chroma_w: u8,
    /// Vertical chroma subsampling as a power-of-two shift (planes 1 and 2).
    #[serde(default)]
    pub log2_chroma_h: u8,
    /// Up to four components.
    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
}

impl PixelFormatDescriptor {
    /// Start a descriptor with no components, flags or subsampling.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id: PixelFormatId(id),
            name: name.into(),
            flags: PixFmtFlags::empty(),
            log2_chroma_w: 0,
            log2_chroma_h: 0,
            components: Vec::new(),
        }
    }

    /// Add flags.
    pub fn with_flags(mut self, flags: PixFmtFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    /// Set chroma subsampling shifts.
    pub fn with_chroma_shift(mut self, log2_w: u8, log2_h: u8) -> Self {
        self.log2_chroma_w = log2_w;
        self.log2_chroma_h = log2_h;
        self
    }

    /// Append a component.
    pub fn with_component(mut self, plane: u8, step: u8, offset: u8, depth: u8) -> Self {
        self.components.push(ComponentDescriptor {
            plane,
            step,
            offset,
            depth,
        });
        self
    }

    /// Number of components.
    pub fn nb_components(&self) -> usize {
        self.components.len()
    }

    /// Hardware-only formats have no linear byte layout.
    pub fn is_hwaccel(&self) -> bool {
        self.flags.contains(PixFmtFlags::HWACCEL)
    }

    /// True for palette and pseudo-palette formats.
    pub fn has_palette(&self) -> bool {
        self.flags.intersects(PixFmtFlags::PAL | PixFmtFlags::PSEUDO_PAL)
    }

    /// True when samples are packed bitwise.
    pub fn is_bitstream(&self) -> bool {
        self.flags.contains(PixFmtFlags::BITSTREAM)
    }

    /// Check structural limits: at most four components, each on a plane below four,
    /// and subsampling shifts below 32.
    pub fn validate(&self) -> AvPrepResult<()> {
        if self.name.trim().is_empty() {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format {} has an empty name",
                self.id
            )));
        }
        if self.components.len() > MAX_PLANES {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' declares {} components (max {MAX_PLANES})",
                self.name,
                self.components.len()
            )));
        }
        if let Some(c) = self
            .components
            .iter()
            .find(|c| usize::from(c.plane) >= MAX_PLANES)
        {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' places a component on plane {}",
                self.name, c.plane
            )));
        }
        if self.log2_chroma_w >= 32 || self.log2_chroma_h >= 32 {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' has an out-of-range chroma shift",
                self.name
            )));
        }
        Ok(())
    }
}

/// Lookup seam for pixel format metadata owned by the wrapped media library.
pub trait PixelFormatCatalog {
    /// Descriptor for `id`, or `None` when the catalog does not know it.
    fn describe(&self, id: PixelFormatId) -> Option<&PixelFormatDescriptor>;
}

#[cfg(test)]
#[path = "../../tests/unit/pixfmt/descriptor.rs"]
mod tests;
