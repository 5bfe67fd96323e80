use super::*;

fn scaler_flags() -> OptionSpec {
    OptionSpec::new("sws_flags", OptionKind::Flags).constants(&[
        ("fast_bilinear", 1),
        ("bilinear", 2),
        ("bicubic", 4),
        ("accurate_rnd", 0x40000),
    ])
}

#[test]
fn numbers_accept_si_suffixes_and_hex() {
    assert_eq!(parse_number("250"), Some(250.0));
    assert_eq!(parse_number("1.5M"), Some(1_500_000.0));
    assert_eq!(parse_number("64k"), Some(64_000.0));
    assert_eq!(parse_number("2Ki"), Some(2048.0));
    assert_eq!(parse_number("0x10"), Some(16.0));
    assert_eq!(parse_number("-3"), Some(-3.0));
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("fast"), None);
    assert_eq!(parse_number("nan"), None);
    assert_eq!(parse_number("-0x10"), Some(-16.0));
    assert_eq!(parse_number("0x-5"), None);
    assert_eq!(parse_number("0x+5"), None);
}

#[test]
fn flags_combine_named_constants() {
    let spec = scaler_flags();
    assert_eq!(parse_flags(&spec, "bicubic"), Ok(4));
    assert_eq!(parse_flags(&spec, "bicubic+accurate_rnd"), Ok(0x40004));
    assert_eq!(parse_flags(&spec, "+bilinear+bicubic-bilinear"), Ok(4));
    assert_eq!(parse_flags(&spec, "0x3"), Ok(3));
    assert!(parse_flags(&spec, "nearest").is_err());
    assert!(parse_flags(&spec, "").is_err());
    assert!(parse_flags(&spec, "bicubic++").is_err());
}

#[test]
fn integers_honour_bounds_and_constants() {
    let spec = OptionSpec::new("g", OptionKind::Int).range(-1.0, 1000.0);
    assert!(validate_value(&spec, "250").is_ok());
    assert!(validate_value(&spec, "-1").is_ok());
    assert!(validate_value(&spec, "1001").is_err());
    assert!(validate_value(&spec, "abc").is_err());

    let strict = OptionSpec::new("strict", OptionKind::Int)
        .range(-2.0, 2.0)
        .constants(&[("experimental", -2), ("normal", 0)]);
    assert!(validate_value(&strict, "experimental").is_ok());

    let unbounded = OptionSpec::new("b", OptionKind::Int);
    assert!(validate_value(&unbounded, "3G").is_err());
    let wide = OptionSpec::new("b", OptionKind::Int64);
    assert!(validate_value(&wide, "3G").is_ok());
}

#[test]
fn booleans() {
    let spec = OptionSpec::new("fflags_genpts", OptionKind::Bool);
    for ok in ["true", "off", "1", "0", "auto", "Yes"] {
        assert!(validate_value(&spec, ok).is_ok(), "{ok}");
    }
    assert!(validate_value(&spec, "2").is_err());
    assert!(validate_value(&spec, "maybe").is_err());
}

#[test]
fn rationals_and_sizes() {
    assert_eq!(parse_rational("30000/1001"), Ok((30000, 1001)));
    assert_eq!(parse_rational("16:9"), Ok((16, 9)));
    assert_eq!(parse_rational("25"), Ok((25, 1)));
    assert_eq!(parse_rational("0.5"), Ok((500_000, 1_000_000)));
    assert!(parse_rational("1/0").is_err());

    assert_eq!(parse_image_size("1920x1080"), Ok((1920, 1080)));
    assert_eq!(parse_image_size("hd720"), Ok((1280, 720)));
    assert!(parse_image_size("0x10").is_err());
    assert!(parse_image_size("1920*1080").is_err());
}

#[test]
fn durations_in_both_syntaxes() {
    assert_eq!(parse_duration("1.5"), Ok(1_500_000));
    assert_eq!(parse_duration("500ms"), Ok(500_000));
    assert_eq!(parse_duration("20us"), Ok(20));
    assert_eq!(parse_duration("2s"), Ok(2_000_000));
    assert_eq!(parse_duration("01:02:03.25"), Ok(3_723_250_000));
    assert_eq!(parse_duration("-00:30"), Ok(-30_000_000));
    assert!(parse_duration("1:75").is_err());
    assert!(parse_duration("").is_err());
    assert!(parse_duration("abc").is_err());
}

#[test]
fn oversized_durations_are_rejected() {
    assert!(parse_duration("9999999999999999:00:00").is_err());
    assert!(parse_duration("18446744073709551615:59:59").is_err());
    assert!(parse_duration("3000000000:00:00").is_err());
    assert_eq!(parse_duration("2562047:00:00"), Ok(9_223_369_200_000_000));
}

#[test]
fn formats() {
    let pix = OptionSpec::new("pixel_format", OptionKind::PixelFmt);
    assert!(validate_value(&pix, "yuv420p").is_ok());
    assert!(validate_value(&pix, "-1").is_ok());
    assert!(validate_value(&pix, "-2").is_err());
    assert!(validate_value(&pix, "YUV 420").is_err());

    let smp = OptionSpec::new("sample_fmt", OptionKind::SampleFmt);
    assert!(validate_value(&smp, "fltp").is_ok());
    assert!(validate_value(&smp, "s24").is_err());
}
