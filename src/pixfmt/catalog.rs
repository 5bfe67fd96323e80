use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::pixfmt::descriptor::{
    PixFmtFlags, PixelFormatCatalog, PixelFormatDescriptor, PixelFormatId,
};

/// In-memory [`PixelFormatCatalog`] keyed by [`PixelFormatId`].
///
/// Tables are either the built-in set of common formats or loaded from a JSON array of
/// descriptors, e.g.
///
/// ```json
/// [{ "id": 0, "name": "yuv420p", "flags": ["planar"], "log2_chroma_w": 1,
///    "log2_chroma_h": 1, "components": [{"plane": 0}, {"plane": 1}, {"plane": 2}] }]
/// ```
#[derive(Clone, Debug, Default)]
pub struct PixelFormatTable {
    formats: BTreeMap<PixelFormatId, PixelFormatDescriptor>,
}

impl PixelFormatTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a descriptor. Ids and names must be unique.
    pub fn insert(&mut self, desc: PixelFormatDescriptor) -> AvPrepResult<()> {
        desc.validate()?;
        if desc.id == PixelFormatId::NONE {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' uses the reserved id {}",
                desc.name, desc.id
            )));
        }
        if self.formats.contains_key(&desc.id) {
            return Err(AvPrepError::invalid_argument(format!(
                "duplicate pixel format id {}",
                desc.id
            )));
        }
        if self.by_name(&desc.name).is_some() {
            return Err(AvPrepError::invalid_argument(format!(
                "duplicate pixel format name '{}'",
                desc.name
            )));
        }
        self.formats.insert(desc.id, desc);
        Ok(())
    }

    /// Build a table from descriptors, failing on the first invalid one.
    pub fn from_descriptors(
        descs: impl IntoIterator<Item = PixelFormatDescriptor>,
    ) -> AvPrepResult<Self> {
        let mut table = Self::new();
        for desc in descs {
            table.insert(desc)?;
        }
        Ok(table)
    }

    /// Parse a JSON array of descriptors.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvPrepResult<Self> {
        let descs: Vec<PixelFormatDescriptor> = serde_json::from_reader(r)
            .map_err(|e| AvPrepError::serde(format!("parse pixel format catalog JSON: {e}")))?;
        Self::from_descriptors(descs)
    }

    /// Parse a JSON array of descriptors from a string.
    pub fn from_json_str(s: &str) -> AvPrepResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a JSON catalog file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvPrepResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open pixel format catalog '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Table of commonly used formats.
    pub fn builtin() -> Self {
        Self {
            formats: builtin_descriptors()
                .into_iter()
                .map(|d| (d.id, d))
                .collect(),
        }
    }

    /// Look a descriptor up by its canonical name.
    pub fn by_name(&self, name: &str) -> Option<&PixelFormatDescriptor> {
        self.formats.values().find(|d| d.name == name)
    }

    /// Descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PixelFormatDescriptor> {
        self.formats.values()
    }

    /// Number of formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// True when the table holds no formats.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl PixelFormatCatalog for PixelFormatTable {
    fn describe(&self, id: PixelFormatId) -> Option<&PixelFormatDescriptor> {
        self.formats.get(&id)
    }
}

fn planar_yuv(id: i32, name: &str, log2_w: u8, log2_h: u8) -> PixelFormatDescriptor {
    PixelFormatDescriptor::new(id, name)
        .with_flags(PixFmtFlags::PLANAR)
        .with_chroma_shift(log2_w, log2_h)
        .with_component(0, 1, 0, 8)
        .with_component(1, 1, 0, 8)
        .with_component(2, 1, 0, 8)
}

fn packed_rgb(id: i32, name: &str, step: u8, offsets: [u8; 3]) -> PixelFormatDescriptor {
    offsets.into_iter().fold(
        PixelFormatDescriptor::new(id, name).with_flags(PixFmtFlags::RGB),
        |d, off| d.with_component(0, step, off, 8),
    )
}

fn packed_rgba(id: i32, name: &str, offsets: [u8; 4]) -> PixelFormatDescriptor {
    offsets.into_iter().fold(
        PixelFormatDescriptor::new(id, name).with_flags(PixFmtFlags::RGB | PixFmtFlags::ALPHA),
        |d, off| d.with_component(0, 4, off, 8),
    )
}

fn builtin_descriptors() -> Vec<PixelFormatDescriptor> {
    vec![
        planar_yuv(0, "yuv420p", 1, 1),
        PixelFormatDescriptor::new(1, "yuyv422")
            .with_chroma_shift(1, 0)
            .with_component(0, 2, 0, 8)
            .with_component(0, 4, 1, 8)
            .with_component(0, 4, 3, 8),
        packed_rgb(2, "rgb24", 3, [0, 1, 2]),
        packed_rgb(3, "bgr24", 3, [2, 1, 0]),
        planar_yuv(4, "yuv422p", 1, 0),
        planar_yuv(5, "yuv444p", 0, 0),
        planar_yuv(6, "yuv410p", 2, 2),
        planar_yuv(7, "yuv411p", 2, 0),
        PixelFormatDescriptor::new(8, "gray").with_component(0, 1, 0, 8),
        PixelFormatDescriptor::new(9, "monowhite")
            .with_flags(PixFmtFlags::BITSTREAM)
            .with_component(0, 1, 0, 1),
        PixelFormatDescriptor::new(10, "monoblack")
            .with_flags(PixFmtFlags::BITSTREAM)
            .with_component(0, 1, 0, 1),
        PixelFormatDescriptor::new(11, "pal8")
            .with_flags(PixFmtFlags::PAL | PixFmtFlags::ALPHA)
            .with_component(0, 1, 0, 8),
        planar_yuv(12, "yuvj420p", 1, 1),
        PixelFormatDescriptor::new(15, "uyvy422")
            .with_chroma_shift(1, 0)
            .with_component(0, 2, 1, 8)
            .with_component(0, 4, 0, 8)
            .with_component(0, 4, 2, 8),
        PixelFormatDescriptor::new(17, "bgr8")
            .with_flags(PixFmtFlags::RGB | PixFmtFlags::PSEUDO_PAL)
            .with_component(0, 1, 0, 3)
            .with_component(0, 1, 0, 3)
            .with_component(0, 1, 0, 2),
        PixelFormatDescriptor::new(20, "rgb8")
            .with_flags(PixFmtFlags::RGB | PixFmtFlags::PSEUDO_PAL)
            .with_component(0, 1, 0, 3)
            .with_component(0, 1, 0, 3)
            .with_component(0, 1, 0, 2),
        PixelFormatDescriptor::new(23, "nv12")
            .with_flags(PixFmtFlags::PLANAR)
            .with_chroma_shift(1, 1)
            .with_component(0, 1, 0, 8)
            .with_component(1, 2, 0, 8)
            .with_component(1, 2, 1, 8),
        PixelFormatDescriptor::new(24, "nv21")
            .with_flags(PixFmtFlags::PLANAR)
            .with_chroma_shift(1, 1)
            .with_component(0, 1, 0, 8)
            .with_component(1, 2, 1, 8)
            .with_component(1, 2, 0, 8),
        packed_rgba(25, "argb", [1, 2, 3, 0]),
        packed_rgba(26, "rgba", [0, 1, 2, 3]),
        packed_rgba(27, "abgr", [3, 2, 1, 0]),
        packed_rgba(28, "bgra", [2, 1, 0, 3]),
        PixelFormatDescriptor::new(29, "gray16be")
            .with_flags(PixFmtFlags::BE)
            .with_component(0, 2, 0, 16),
        PixelFormatDescriptor::new(30, "gray16le").with_component(0, 2, 0, 16),
        planar_yuv(31, "yuv440p", 0, 1),
        planar_yuv(33, "yuva420p", 1, 1)
            .with_flags(PixFmtFlags::ALPHA)
            .with_component(3, 1, 0, 8),
        PixelFormatDescriptor::new(44, "vaapi").with_flags(PixFmtFlags::HWACCEL),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/pixfmt/catalog.rs"]
mod tests;
