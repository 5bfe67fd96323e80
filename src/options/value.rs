//! Value syntax checks for table-backed option contexts.

use crate::options::schema::OptionKind;
use crate::options::table::OptionSpec;

const SAMPLE_FORMATS: &[&str] = &[
    "u8", "s16", "s32", "flt", "dbl", "u8p", "s16p", "s32p", "fltp", "dblp", "s64", "s64p",
];

const SIZE_ABBREVIATIONS: &[(&str, u32, u32)] = &[
    ("ntsc", 720, 480),
    ("pal", 720, 576),
    ("sqcif", 128, 96),
    ("qcif", 176, 144),
    ("cif", 352, 288),
    ("4cif", 704, 576),
    ("qvga", 320, 240),
    ("vga", 640, 480),
    ("svga", 800, 600),
    ("xga", 1024, 768),
    ("hd480", 852, 480),
    ("hd720", 1280, 720),
    ("hd1080", 1920, 1080),
    ("2k", 2048, 1080),
    ("4k", 4096, 2160),
    ("uhd2160", 3840, 2160),
];

/// Check `value` against `spec`. The error is a human-readable reason.
pub(crate) fn validate_value(spec: &OptionSpec, value: &str) -> Result<(), String> {
    match spec.kind {
        OptionKind::Flags => parse_flags(spec, value).map(|_| ()),
        OptionKind::Int => {
            let v = parse_integer(spec, value)?;
            check_range(spec, v as f64, i32::MIN as f64, i32::MAX as f64)
        }
        OptionKind::Int64 => {
            let v = parse_integer(spec, value)?;
            check_range(spec, v as f64, i64::MIN as f64, i64::MAX as f64)
        }
        OptionKind::Double => {
            let v = parse_real(spec, value)?;
            check_range(spec, v, f64::MIN, f64::MAX)
        }
        OptionKind::Float => {
            let v = parse_real(spec, value)?;
            check_range(spec, v, f32::MIN as f64, f32::MAX as f64)
        }
        OptionKind::Bool => parse_bool(spec, value).map(|_| ()),
        OptionKind::String => Ok(()),
        OptionKind::Rational => {
            let (num, den) = parse_rational(value)?;
            check_range(spec, num as f64 / den as f64, f64::MIN, f64::MAX)
        }
        OptionKind::ImageSize => parse_image_size(value).map(|_| ()),
        OptionKind::PixelFmt => parse_format(spec, value, None).map(|_| ()),
        OptionKind::SampleFmt => parse_format(spec, value, Some(SAMPLE_FORMATS)).map(|_| ()),
        OptionKind::Duration => {
            let us = parse_duration(value)?;
            check_range(spec, us as f64, i64::MIN as f64, i64::MAX as f64)
        }
    }
}

fn check_range(spec: &OptionSpec, v: f64, lo: f64, hi: f64) -> Result<(), String> {
    let min = spec.min.unwrap_or(lo);
    let max = spec.max.unwrap_or(hi);
    if v < min || v > max {
        return Err(format!("value {v} out of range [{min} - {max}]"));
    }
    Ok(())
}

/// Decimal or `0x` hex number with an optional SI suffix (`k`, `M`, `G`, or their binary
/// `Ki`, `Mi`, `Gi` forms).
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let base = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if hex.starts_with(['+', '-']) {
            return None;
        }
        i64::from_str_radix(hex, 16).ok()? as f64
    } else {
        let (digits, mult) = split_si_suffix(body);
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return None;
        }
        let v: f64 = digits.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        v * mult
    };
    Some(if neg { -base } else { base })
}

fn split_si_suffix(s: &str) -> (&str, f64) {
    const SUFFIXES: &[(&str, f64)] = &[
        ("Ki", 1024.0),
        ("Mi", 1024.0 * 1024.0),
        ("Gi", 1024.0 * 1024.0 * 1024.0),
        ("k", 1e3),
        ("K", 1e3),
        ("M", 1e6),
        ("G", 1e9),
    ];
    for (suffix, mult) in SUFFIXES {
        if let Some(digits) = s.strip_suffix(suffix) {
            return (digits, *mult);
        }
    }
    (s, 1.0)
}

fn parse_integer(spec: &OptionSpec, value: &str) -> Result<i64, String> {
    if let Some(c) = spec.constant(value) {
        return Ok(c);
    }
    let v = parse_number(value).ok_or_else(|| format!("'{value}' is not a number"))?;
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return Err(format!("'{value}' does not fit in an integer"));
    }
    Ok(v.round() as i64)
}

fn parse_real(spec: &OptionSpec, value: &str) -> Result<f64, String> {
    if let Some(c) = spec.constant(value) {
        return Ok(c as f64);
    }
    parse_number(value).ok_or_else(|| format!("'{value}' is not a number"))
}

fn parse_bool(spec: &OptionSpec, value: &str) -> Result<i64, String> {
    let lowered = value.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "auto" => return Ok(-1),
        "true" | "y" | "yes" | "enable" | "on" => return Ok(1),
        "false" | "n" | "no" | "disable" | "off" => return Ok(0),
        _ => {}
    }
    if let Some(c) = spec.constant(value) {
        return Ok(c);
    }
    match parse_number(value) {
        Some(v) if v == 0.0 || v == 1.0 || v == -1.0 => Ok(v as i64),
        _ => Err(format!("'{value}' is not a boolean")),
    }
}

/// Resolve `+a-b+c` flag syntax to a bitmask. A leading token without sign sets the
/// mask outright.
pub(crate) fn parse_flags(spec: &OptionSpec, value: &str) -> Result<i64, String> {
    if value.is_empty() {
        return Err("empty flags value".to_owned());
    }
    let mut mask = 0i64;
    let mut rest = value;
    while !rest.is_empty() {
        let (sign, body) = match rest.as_bytes()[0] {
            b'+' => (Some(true), &rest[1..]),
            b'-' => (Some(false), &rest[1..]),
            _ => (None, rest),
        };
        let end = body.find(['+', '-']).unwrap_or(body.len());
        let token = &body[..end];
        rest = &body[end..];
        if token.is_empty() {
            return Err(format!("empty flag in '{value}'"));
        }
        let bits = match spec.constant(token) {
            Some(bits) => bits,
            None => match parse_number(token) {
                Some(v) if v.fract() == 0.0 => v as i64,
                _ => return Err(format!("unknown flag '{token}'")),
            },
        };
        match sign {
            Some(true) => mask |= bits,
            Some(false) => mask &= !bits,
            None => mask = bits,
        }
    }
    Ok(mask)
}

/// `num/den`, `num:den`, or a plain number (approximated with a millionths denominator).
pub(crate) fn parse_rational(value: &str) -> Result<(i64, i64), String> {
    let bad = || format!("'{value}' is not a rational");
    if let Some((num, den)) = value.split_once(['/', ':']) {
        let num: i64 = num.trim().parse().map_err(|_| bad())?;
        let den: i64 = den.trim().parse().map_err(|_| bad())?;
        if den == 0 {
            return Err(format!("'{value}' has a zero denominator"));
        }
        return Ok((num, den));
    }
    let v = parse_number(value).ok_or_else(bad)?;
    if v.fract() == 0.0 {
        return Ok((v as i64, 1));
    }
    Ok(((v * 1_000_000.0).round() as i64, 1_000_000))
}

/// `WxH` or a named size such as `hd720`.
pub(crate) fn parse_image_size(value: &str) -> Result<(u32, u32), String> {
    if let Some(&(_, w, h)) = SIZE_ABBREVIATIONS.iter().find(|(name, _, _)| *name == value) {
        return Ok((w, h));
    }
    let bad = || format!("'{value}' is not a WIDTHxHEIGHT size");
    let (w, h) = value.split_once('x').ok_or_else(bad)?;
    let w: u32 = w.parse().map_err(|_| bad())?;
    let h: u32 = h.parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(format!("'{value}' has a zero dimension"));
    }
    Ok((w, h))
}

fn parse_format(spec: &OptionSpec, value: &str, known: Option<&[&str]>) -> Result<i64, String> {
    if let Some(c) = spec.constant(value) {
        return Ok(c);
    }
    if let Ok(n) = value.parse::<i64>() {
        return if n >= -1 {
            Ok(n)
        } else {
            Err(format!("'{value}' is not a format number"))
        };
    }
    let well_formed = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    match known {
        Some(names) if names.contains(&value) => Ok(-1),
        Some(_) => Err(format!("unknown format '{value}'")),
        None if well_formed => Ok(-1),
        None => Err(format!("'{value}' is not a format name")),
    }
}

/// Microseconds in `[-][HH:]MM:SS[.m...]` or `[-]S+[.m...][s|ms|us]`.
pub(crate) fn parse_duration(value: &str) -> Result<i64, String> {
    let bad = || format!("'{value}' is not a duration");
    let (neg, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if body.is_empty() {
        return Err(bad());
    }
    let us = if body.contains(':') {
        let parts: Vec<&str> = body.split(':').collect();
        let (h, m, s) = match parts.as_slice() {
            [m, s] => ("0", *m, *s),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(bad()),
        };
        let h: u64 = h.parse().map_err(|_| bad())?;
        let m: u64 = m.parse().map_err(|_| bad())?;
        if m > 59 {
            return Err(bad());
        }
        let s = parse_seconds(s).ok_or_else(bad)?;
        if s >= 60_000_000 {
            return Err(bad());
        }
        h.checked_mul(3600)
            .and_then(|hs| hs.checked_add(m * 60))
            .and_then(|secs| secs.checked_mul(1_000_000))
            .and_then(|us| us.checked_add(s))
            .ok_or_else(bad)?
    } else {
        let (digits, scale) = if let Some(d) = body.strip_suffix("ms") {
            (d, 1_000)
        } else if let Some(d) = body.strip_suffix("us") {
            (d, 1)
        } else {
            (body.strip_suffix('s').unwrap_or(body), 1_000_000)
        };
        let secs = parse_seconds(digits).ok_or_else(bad)?;
        secs / (1_000_000 / scale)
    };
    let us = i64::try_from(us).map_err(|_| bad())?;
    Ok(if neg { -us } else { us })
}

/// `S+[.m...]` as microseconds.
fn parse_seconds(s: &str) -> Option<u64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: u64 = whole.parse().ok()?;
    let mut micros = 0u64;
    for (i, d) in frac.bytes().take(6).enumerate() {
        micros += u64::from(d - b'0') * 10u64.pow(5 - i as u32);
    }
    whole.checked_mul(1_000_000)?.checked_add(micros)
}

#[cfg(test)]
#[path = "../../tests/unit/options/value.rs"]
mod tests;
