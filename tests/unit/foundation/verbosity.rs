use super::*;

#[test]
fn clones_share_one_level() {
    let a = VerbosityHandle::new(Verbosity::Warning);
    let b = a.clone();
    b.set(Verbosity::Error);
    assert_eq!(a.level(), Verbosity::Error);
}

#[test]
fn raise_never_lowers() {
    let h = VerbosityHandle::new(Verbosity::Trace);
    let prev = h.raise_to(Verbosity::Debug);
    assert_eq!(prev, Verbosity::Trace);
    assert_eq!(h.level(), Verbosity::Trace);

    let h = VerbosityHandle::default();
    assert_eq!(h.raise_to(Verbosity::Debug), Verbosity::Info);
    assert_eq!(h.level(), Verbosity::Debug);
}

#[test]
fn level_filter_tracks_level() {
    let h = VerbosityHandle::new(Verbosity::Quiet);
    assert_eq!(h.level_filter(), LevelFilter::OFF);
    h.set(Verbosity::Debug);
    assert_eq!(h.level_filter(), LevelFilter::DEBUG);
    assert_eq!(Verbosity::Verbose.level_filter(), LevelFilter::INFO);
}

#[test]
fn verbosity_parses_from_json() {
    let v: Verbosity = serde_json::from_str("\"debug\"").unwrap();
    assert_eq!(v, Verbosity::Debug);
}
