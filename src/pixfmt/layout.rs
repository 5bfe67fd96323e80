use crate::foundation::core::{
    ALIGN_HEADROOM, LineStrides, MAX_BUFFER_SIZE, MAX_PLANES, PALETTE_SIZE, PlaneArray,
};
use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::pixfmt::descriptor::{PixelFormatCatalog, PixelFormatDescriptor, PixelFormatId};

/// Byte layout of one frame buffer: size of every physical plane and which planes exist.
///
/// Invariants upheld by [`PlaneLayout::resolve`]:
/// - `sizes[i] > 0` implies `required[i]`;
/// - `total` equals the sum of `sizes` and never exceeds [`MAX_BUFFER_SIZE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlaneLayout {
    /// Byte size per plane; unused planes are 0.
    pub sizes: PlaneArray<usize>,
    /// Planes referenced by the format.
    pub required: PlaneArray<bool>,
    /// Sum of all plane sizes.
    pub total: usize,
}

impl PlaneLayout {
    /// Size every plane of a `height`-row frame of format `desc` with row pitches `strides`.
    ///
    /// Every multiplication and addition is range-checked before it executes, so malformed
    /// strides are rejected with [`AvPrepError::Overflow`] instead of wrapping.
    ///
    /// Palette formats (`PAL` or `PSEUDO_PAL`) size plane 0 from the strides and carry a fixed
    /// [`PALETTE_SIZE`] color table as plane 1; nothing past plane 1 is examined.
    #[tracing::instrument(level = "trace", skip(desc), fields(format = %desc.name))]
    pub fn resolve(
        desc: &PixelFormatDescriptor,
        height: u32,
        strides: &LineStrides,
    ) -> AvPrepResult<Self> {
        if height == 0 {
            return Err(AvPrepError::invalid_argument("frame height must be non-zero"));
        }
        if desc.is_hwaccel() {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' is a hardware surface without a byte layout",
                desc.name
            )));
        }

        let rows = height as usize;
        let mut layout = Self::default();

        if strides[0] > (MAX_BUFFER_SIZE - ALIGN_HEADROOM) / rows {
            return Err(AvPrepError::overflow(format!(
                "plane 0 of {rows} rows with stride {} exceeds the buffer size limit",
                strides[0]
            )));
        }
        layout.sizes[0] = strides[0] * rows;
        layout.required[0] = true;

        if desc.has_palette() {
            layout.sizes[1] = PALETTE_SIZE;
            layout.required[1] = true;
            layout.total = layout.sizes[0] + PALETTE_SIZE;
            return Ok(layout);
        }

        for c in &desc.components {
            let Some(slot) = layout.required.get_mut(usize::from(c.plane)) else {
                return Err(AvPrepError::invalid_argument(format!(
                    "pixel format '{}' places a component on plane {}",
                    desc.name, c.plane
                )));
            };
            *slot = true;
        }

        let mut total = layout.sizes[0];
        for i in 1..MAX_PLANES {
            // Planes are sized in order; a gap ends the walk.
            if !layout.required[i] {
                break;
            }
            let plane_rows = match i {
                1 | 2 => chroma_rows(height, desc.log2_chroma_h) as usize,
                _ => rows,
            };
            if strides[i] > MAX_BUFFER_SIZE / plane_rows {
                return Err(AvPrepError::overflow(format!(
                    "plane {i} of {plane_rows} rows with stride {} exceeds the buffer size limit",
                    strides[i]
                )));
            }
            let size = plane_rows * strides[i];
            if total > MAX_BUFFER_SIZE - size {
                return Err(AvPrepError::overflow(format!(
                    "total buffer size exceeds the limit at plane {i}"
                )));
            }
            layout.sizes[i] = size;
            total += size;
        }

        layout.total = total;
        Ok(layout)
    }

    /// Number of planes the format uses.
    pub fn plane_count(&self) -> usize {
        self.required.iter().filter(|r| **r).count()
    }

    /// Byte offset of each used plane inside one contiguous allocation of `total` bytes.
    pub fn offsets(&self) -> PlaneArray<Option<usize>> {
        let mut out = [None; MAX_PLANES];
        let mut at = 0;
        for i in 0..MAX_PLANES {
            if self.required[i] {
                out[i] = Some(at);
            }
            at += self.sizes[i];
        }
        out
    }

    /// Split a contiguous buffer into per-plane slices; unused planes get empty slices.
    pub fn split<'a>(&self, buf: &'a [u8]) -> AvPrepResult<PlaneArray<&'a [u8]>> {
        if buf.len() < self.total {
            return Err(AvPrepError::invalid_argument(format!(
                "buffer of {} bytes is smaller than the {} byte layout",
                buf.len(),
                self.total
            )));
        }
        let empty: &'a [u8] = &[];
        let mut out = [empty; MAX_PLANES];
        let mut rest = buf;
        for (slot, &size) in out.iter_mut().zip(self.sizes.iter()) {
            let (head, tail) = rest.split_at(size);
            *slot = head;
            rest = tail;
        }
        Ok(out)
    }

    /// Zeroed, separately owned buffer for each plane.
    pub fn allocate(&self) -> PlaneArray<Vec<u8>> {
        self.sizes.map(|size| vec![0u8; size])
    }
}

/// Resolve the layout of format `format` looked up in `catalog`.
///
/// Fails with [`AvPrepError::InvalidArgument`] for a zero height (checked first), or for a
/// format the catalog does not know or that is hardware-only.
pub fn resolve_plane_layout<C>(
    catalog: &C,
    format: PixelFormatId,
    height: u32,
    strides: &LineStrides,
) -> AvPrepResult<PlaneLayout>
where
    C: PixelFormatCatalog + ?Sized,
{
    if height == 0 {
        return Err(AvPrepError::invalid_argument("frame height must be non-zero"));
    }
    let Some(desc) = catalog.describe(format) else {
        tracing::debug!(%format, "unknown pixel format");
        return Err(AvPrepError::invalid_argument(format!(
            "unknown pixel format {format}"
        )));
    };
    PlaneLayout::resolve(desc, height, strides)
}

/// Rows of a chroma plane: `ceil(height / 2^shift)`.
pub(crate) fn chroma_rows(height: u32, shift: u8) -> u32 {
    if shift >= 32 {
        return u32::from(height > 0);
    }
    height.div_ceil(1u32 << shift)
}

#[cfg(test)]
#[path = "../../tests/unit/pixfmt/layout.rs"]
mod tests;
