use crate::foundation::core::{LineStrides, MAX_BUFFER_SIZE, MAX_PLANES, PlaneArray};
use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::pixfmt::descriptor::PixelFormatDescriptor;

/// Per-plane row pitches of a tightly packed `width`-pixel frame, each rounded up to a
/// multiple of `align` bytes (`0` and `1` mean unaligned).
///
/// A plane's pitch is its widest component step times the plane's width in samples; the
/// width is chroma-subsampled when that widest component is a chroma component. Bitstream
/// formats count steps in bits and round up to whole bytes. Planes without components
/// get a zero pitch.
pub fn fill_line_strides(
    desc: &PixelFormatDescriptor,
    width: u32,
    align: usize,
) -> AvPrepResult<LineStrides> {
    if width == 0 {
        return Err(AvPrepError::invalid_argument("frame width must be non-zero"));
    }
    if desc.is_hwaccel() {
        return Err(AvPrepError::invalid_argument(format!(
            "pixel format '{}' is a hardware surface without a byte layout",
            desc.name
        )));
    }

    let (max_step, max_step_comp) = max_pixel_steps(desc)?;
    let align = align.max(1);
    let mut strides = [0usize; MAX_PLANES];

    for plane in 0..MAX_PLANES {
        let step = usize::from(max_step[plane]);
        if step == 0 {
            continue;
        }
        let shift = match max_step_comp[plane] {
            1 | 2 => desc.log2_chroma_w,
            _ => 0,
        };
        let samples = if shift >= 32 {
            1
        } else {
            width.div_ceil(1u32 << shift) as usize
        };
        if step > MAX_BUFFER_SIZE / samples {
            return Err(AvPrepError::overflow(format!(
                "plane {plane} row of {samples} samples at step {step} exceeds the size limit"
            )));
        }
        let mut pitch = step * samples;
        if desc.is_bitstream() {
            pitch = pitch.div_ceil(8);
        }
        let aligned = pitch
            .div_ceil(align)
            .checked_mul(align)
            .filter(|&p| p <= MAX_BUFFER_SIZE)
            .ok_or_else(|| {
                AvPrepError::overflow(format!(
                    "plane {plane} pitch {pitch} aligned to {align} exceeds the size limit"
                ))
            })?;
        strides[plane] = aligned;
    }

    Ok(strides)
}

/// Widest component step on each plane and the index of the component that has it.
/// Ties keep the first component.
fn max_pixel_steps(
    desc: &PixelFormatDescriptor,
) -> AvPrepResult<(PlaneArray<u8>, PlaneArray<usize>)> {
    let mut steps = [0u8; MAX_PLANES];
    let mut comps = [0usize; MAX_PLANES];
    for (i, c) in desc.components.iter().enumerate() {
        let plane = usize::from(c.plane);
        if plane >= MAX_PLANES {
            return Err(AvPrepError::invalid_argument(format!(
                "pixel format '{}' places a component on plane {}",
                desc.name, c.plane
            )));
        }
        if c.step > steps[plane] {
            steps[plane] = c.step;
            comps[plane] = i;
        }
    }
    Ok((steps, comps))
}

#[cfg(test)]
#[path = "../../tests/unit/pixfmt/stride.rs"]
mod tests;
