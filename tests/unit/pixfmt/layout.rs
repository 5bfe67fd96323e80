use super::*;
use crate::pixfmt::catalog::PixelFormatTable;
use crate::pixfmt::descriptor::PixFmtFlags;

fn planar(log2_h: u8) -> PixelFormatDescriptor {
    PixelFormatDescriptor::new(100, "test_planar")
        .with_chroma_shift(1, log2_h)
        .with_component(0, 1, 0, 8)
        .with_component(1, 1, 0, 8)
        .with_component(2, 1, 0, 8)
}

fn assert_sum_invariant(layout: &PlaneLayout) {
    let sum: usize = (0..MAX_PLANES)
        .filter(|&i| layout.required[i])
        .map(|i| layout.sizes[i])
        .sum();
    assert_eq!(layout.total, sum);
    for i in 0..MAX_PLANES {
        if layout.sizes[i] > 0 {
            assert!(layout.required[i], "plane {i} sized but not required");
        }
    }
}

#[test]
fn palette_layout_is_image_plus_color_table() {
    let desc = PixelFormatDescriptor::new(11, "pal8")
        .with_flags(PixFmtFlags::PAL)
        .with_component(0, 1, 0, 8)
        .with_component(3, 1, 0, 8);
    let layout = PlaneLayout::resolve(&desc, 4, &[8, 99, 99, 99]).unwrap();
    assert_eq!(layout.sizes, [32, 1024, 0, 0]);
    assert_eq!(layout.total, 1056);
    assert_eq!(layout.required, [true, true, false, false]);
    assert_sum_invariant(&layout);
}

#[test]
fn pseudo_palette_also_gets_color_table() {
    let desc = PixelFormatDescriptor::new(17, "bgr8")
        .with_flags(PixFmtFlags::PSEUDO_PAL)
        .with_component(0, 1, 0, 3);
    let layout = PlaneLayout::resolve(&desc, 2, &[10, 0, 0, 0]).unwrap();
    assert_eq!(layout.sizes, [20, PALETTE_SIZE, 0, 0]);
}

#[test]
fn chroma_height_rounds_up() {
    let layout = PlaneLayout::resolve(&planar(1), 5, &[16, 16, 16, 0]).unwrap();
    assert_eq!(layout.sizes, [80, 48, 48, 0]);
    assert_eq!(layout.total, 176);
    assert_sum_invariant(&layout);
}

#[test]
fn alpha_plane_is_never_subsampled() {
    let desc = planar(1).with_component(3, 1, 0, 8);
    let layout = PlaneLayout::resolve(&desc, 5, &[4, 2, 2, 4]).unwrap();
    assert_eq!(layout.sizes, [20, 6, 6, 20]);
    assert_eq!(layout.plane_count(), 4);
    assert_sum_invariant(&layout);
}

#[test]
fn walk_stops_at_first_missing_plane() {
    let desc = PixelFormatDescriptor::new(101, "gap")
        .with_component(0, 1, 0, 8)
        .with_component(1, 1, 0, 8)
        .with_component(3, 1, 0, 8);
    let layout = PlaneLayout::resolve(&desc, 4, &[4, 4, 4, 4]).unwrap();
    assert_eq!(layout.sizes, [16, 16, 0, 0]);
    assert_eq!(layout.required, [true, true, false, true]);
    assert_eq!(layout.total, 32);
}

#[test]
fn packed_format_uses_plane_zero_only() {
    let table = PixelFormatTable::builtin();
    let rgba = table.by_name("rgba").unwrap();
    let layout = PlaneLayout::resolve(rgba, 3, &[40, 40, 40, 40]).unwrap();
    assert_eq!(layout.sizes, [120, 0, 0, 0]);
    assert_eq!(layout.plane_count(), 1);
}

#[test]
fn zero_height_is_invalid_for_every_format() {
    let table = PixelFormatTable::builtin();
    for desc in table.iter() {
        let err = resolve_plane_layout(&table, desc.id, 0, &[1, 1, 1, 1]).unwrap_err();
        assert!(matches!(err, AvPrepError::InvalidArgument(_)), "{}", desc.name);
    }
    let err = resolve_plane_layout(&table, PixelFormatId(9999), 0, &[1; 4]).unwrap_err();
    assert!(err.to_string().contains("height"));
}

#[test]
fn hwaccel_and_unknown_formats_are_invalid() {
    let table = PixelFormatTable::builtin();
    let vaapi = table.by_name("vaapi").unwrap().id;
    for (height, strides) in [(1, [0; 4]), (1080, [4096; 4]), (u32::MAX, [usize::MAX; 4])] {
        assert!(matches!(
            resolve_plane_layout(&table, vaapi, height, &strides),
            Err(AvPrepError::InvalidArgument(_))
        ));
    }
    assert!(matches!(
        resolve_plane_layout(&table, PixelFormatId(9999), 10, &[1; 4]),
        Err(AvPrepError::InvalidArgument(_))
    ));
}

#[test]
fn plane_zero_keeps_alignment_headroom() {
    let gray = PixelFormatDescriptor::new(8, "gray").with_component(0, 1, 0, 8);
    let limit = MAX_BUFFER_SIZE - ALIGN_HEADROOM;
    assert!(PlaneLayout::resolve(&gray, 1, &[limit, 0, 0, 0]).is_ok());
    assert!(matches!(
        PlaneLayout::resolve(&gray, 1, &[limit + 1, 0, 0, 0]),
        Err(AvPrepError::Overflow(_))
    ));
}

#[test]
fn oversized_strides_overflow_instead_of_wrapping() {
    let desc = planar(1);
    assert!(matches!(
        PlaneLayout::resolve(&desc, 1 << 20, &[1 << 12, 0, 0, 0]),
        Err(AvPrepError::Overflow(_))
    ));
    assert!(matches!(
        PlaneLayout::resolve(&desc, 2, &[16, usize::MAX, 16, 0]),
        Err(AvPrepError::Overflow(_))
    ));
    // Each plane fits on its own but the running total does not.
    let big = MAX_BUFFER_SIZE / 2;
    assert!(matches!(
        PlaneLayout::resolve(&desc, 1, &[big, big, big, 0]),
        Err(AvPrepError::Overflow(_))
    ));
}

#[test]
fn out_of_range_component_plane_is_rejected() {
    let desc = PixelFormatDescriptor::new(102, "broken").with_component(7, 1, 0, 8);
    assert!(matches!(
        PlaneLayout::resolve(&desc, 2, &[1; 4]),
        Err(AvPrepError::InvalidArgument(_))
    ));
}

#[test]
fn offsets_and_split_follow_plane_order() {
    let layout = PlaneLayout::resolve(&planar(1), 4, &[4, 2, 2, 0]).unwrap();
    assert_eq!(layout.offsets(), [Some(0), Some(16), Some(20), None]);

    let buf: Vec<u8> = (0..layout.total as u8).collect();
    let planes = layout.split(&buf).unwrap();
    assert_eq!(planes[0].len(), 16);
    assert_eq!(planes[1], &[16, 17, 18, 19]);
    assert_eq!(planes[2], &[20, 21, 22, 23]);
    assert!(planes[3].is_empty());

    assert!(layout.split(&buf[..10]).is_err());

    let owned = layout.allocate();
    assert_eq!(owned.map(|p| p.len()), [16, 4, 4, 0]);
}

#[test]
fn chroma_rows_handles_extreme_shifts() {
    assert_eq!(chroma_rows(5, 0), 5);
    assert_eq!(chroma_rows(5, 1), 3);
    assert_eq!(chroma_rows(5, 2), 2);
    assert_eq!(chroma_rows(u32::MAX, 1), 1 << 31);
    assert_eq!(chroma_rows(7, 40), 1);
}
