use super::*;

#[test]
fn builtin_descriptors_are_valid_and_unique() {
    let table = PixelFormatTable::builtin();
    let rebuilt = PixelFormatTable::from_descriptors(table.iter().cloned()).unwrap();
    assert_eq!(rebuilt.len(), table.len());
    assert!(!table.is_empty());
}

#[test]
fn builtin_lookup_by_id_and_name_agree() {
    let table = PixelFormatTable::builtin();
    let yuv = table.by_name("yuv420p").unwrap();
    assert_eq!(table.describe(yuv.id).unwrap().name, "yuv420p");
    assert_eq!(yuv.log2_chroma_h, 1);
    assert!(table.by_name("vaapi").unwrap().is_hwaccel());
    assert!(table.describe(PixelFormatId(9999)).is_none());
}

#[test]
fn insert_rejects_duplicates_and_reserved_id() {
    let mut table = PixelFormatTable::new();
    table
        .insert(PixelFormatDescriptor::new(8, "gray").with_component(0, 1, 0, 8))
        .unwrap();
    assert!(
        table
            .insert(PixelFormatDescriptor::new(8, "gray2").with_component(0, 1, 0, 8))
            .is_err()
    );
    assert!(
        table
            .insert(PixelFormatDescriptor::new(9, "gray").with_component(0, 1, 0, 8))
            .is_err()
    );
    assert!(
        table
            .insert(PixelFormatDescriptor::new(-1, "none"))
            .is_err()
    );
}

#[test]
fn from_json_str_reports_parse_errors_as_serde() {
    let err = PixelFormatTable::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, AvPrepError::Serde(_)));
}

#[test]
fn from_path_reports_missing_file() {
    let err = PixelFormatTable::from_path("tests/data/does_not_exist.json").unwrap_err();
    assert!(err.to_string().contains("does_not_exist.json"));
}
