use super::*;
use crate::options::schema::SearchScope;

#[test]
fn builtin_catalog_is_valid() {
    let cat = SchemaCatalog::builtin();
    cat.validate().unwrap();
    assert!(cat.scaler.is_some());
    assert!(cat.resampler.is_some());
}

#[test]
fn builtin_shares_strict_between_codec_and_container() {
    let set = SchemaCatalog::builtin();
    let set = set.schemas();
    assert_eq!(
        set.codec.find_option("strict", SearchScope::WithChildren),
        Some(OptionKind::Int)
    );
    assert_eq!(
        set.container.find_option("strict", SearchScope::WithChildren),
        Some(OptionKind::Int)
    );
}

#[test]
fn private_options_live_in_children() {
    let cat = SchemaCatalog::builtin();
    let set = cat.schemas();
    assert_eq!(set.codec.find_option("preset", SearchScope::TopLevel), None);
    assert!(set.codec.find_option("preset", SearchScope::WithChildren).is_some());
    assert!(set.container.find_option("movflags", SearchScope::WithChildren).is_some());
    assert_eq!(
        set.scaler.map(|s| s.find_option("sws_flags", SearchScope::WithChildren)),
        Some(Some(OptionKind::Flags))
    );
}

#[test]
fn scratch_contexts_validate_builtin_values() {
    let cat = SchemaCatalog::builtin();
    let set = cat.schemas();
    let scaler = set.scaler.unwrap();
    let mut ctx = scaler.scratch_context();
    assert!(ctx.set_option("sws_flags", "lanczos+accurate_rnd").is_ok());
    assert!(ctx.set_option("sws_flags", "nearest").is_err());

    let resampler = set.resampler.unwrap();
    let mut ctx = resampler.scratch_context();
    assert!(ctx.set_option("osr", "48000").is_ok());
    assert!(ctx.set_option("cutoff", "1.5").is_err());
}

#[test]
fn json_without_scaler_or_resampler() {
    let cat = SchemaCatalog::from_json_str(
        r#"{"codec":{"name":"c","options":[{"name":"b","kind":"int64"}]},
            "container":{"name":"f"}}"#,
    )
    .unwrap();
    assert!(cat.scaler.is_none());
    assert!(cat.resampler.is_none());
    assert!(cat.schemas().scaler.is_none());
}

#[test]
fn json_errors_are_reported() {
    assert!(matches!(
        SchemaCatalog::from_json_str(r#"{"codec":{"name":"c"}}"#),
        Err(AvPrepError::Serde(_))
    ));
    assert!(matches!(
        SchemaCatalog::from_json_str(
            r#"{"codec":{"name":"c","options":[{"name":"a","kind":"int"},{"name":"a","kind":"int"}]},
                "container":{"name":"f"}}"#
        ),
        Err(AvPrepError::InvalidArgument(_))
    ));
    assert!(matches!(
        SchemaCatalog::from_path("/nonexistent/schemas.json"),
        Err(AvPrepError::Other(_))
    ));
}
