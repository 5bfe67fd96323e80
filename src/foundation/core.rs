/// Number of physical planes a frame buffer can be split into.
pub const MAX_PLANES: usize = 4;

/// Largest buffer size the layout resolver will report.
///
/// Sizes are bounded by the signed 32-bit range used by the wrapped media libraries for
/// allocation sizes, regardless of the host's `usize`.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// Headroom kept free below [`MAX_BUFFER_SIZE`] when sizing plane 0, so callers can add
/// alignment padding without wrapping.
pub const ALIGN_HEADROOM: usize = 1024;

/// Byte size of the color lookup table that palette formats carry as plane 1
/// (256 entries of 4 bytes).
pub const PALETTE_SIZE: usize = 256 * 4;

/// One value per physical plane.
pub type PlaneArray<T> = [T; MAX_PLANES];

/// Bytes per row of each physical plane, padding included.
pub type LineStrides = PlaneArray<usize>;
