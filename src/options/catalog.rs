use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AvPrepError, AvPrepResult};
use crate::options::schema::{OptionKind, OptionSchema, ValidatingSchema};
use crate::options::table::OptionUsage::{Audio, Decoding, Encoding, Filtering, Subtitle, Video};
use crate::options::table::{OptionSpec, OptionUsage, SchemaTable};

/// Option schemas of every subsystem the router knows about.
///
/// The scaler and resampler are optional: builds without them route only to codec and
/// container. Loaded from JSON as
///
/// ```json
/// { "codec": { "name": "AVCodecContext", "options": [...], "children": [...] },
///   "container": { "name": "AVFormatContext", "options": [...] },
///   "scaler": { "name": "SWScaler", "options": [...] } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SchemaCatalog {
    /// Codec schema, private codec options as children.
    pub codec: SchemaTable,
    /// Container schema, private muxer/demuxer options as children.
    pub container: SchemaTable,
    /// Scaler schema, if scaling is available.
    #[serde(default)]
    pub scaler: Option<SchemaTable>,
    /// Resampler schema, if resampling is available.
    #[serde(default)]
    pub resampler: Option<SchemaTable>,
}

/// Borrowed view of the schemas one router consults.
#[derive(Clone, Copy)]
pub struct SchemaSet<'a> {
    /// Codec schema.
    pub codec: &'a dyn OptionSchema,
    /// Container schema.
    pub container: &'a dyn OptionSchema,
    /// Scaler schema.
    pub scaler: Option<&'a dyn ValidatingSchema>,
    /// Resampler schema.
    pub resampler: Option<&'a dyn ValidatingSchema>,
}

impl std::fmt::Debug for SchemaSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaSet")
            .field("scaler", &self.scaler.is_some())
            .field("resampler", &self.resampler.is_some())
            .finish_non_exhaustive()
    }
}

impl SchemaCatalog {
    /// Parse and validate a JSON catalog.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvPrepResult<Self> {
        let catalog: Self = serde_json::from_reader(r)
            .map_err(|e| AvPrepError::serde(format!("parse option schema JSON: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a JSON catalog held in a string.
    pub fn from_json_str(s: &str) -> AvPrepResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> AvPrepResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open option schema catalog '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate every table.
    pub fn validate(&self) -> AvPrepResult<()> {
        self.codec.validate()?;
        self.container.validate()?;
        self.scaler.iter().try_for_each(SchemaTable::validate)?;
        self.resampler.iter().try_for_each(SchemaTable::validate)
    }

    /// Borrow the schemas for routing.
    pub fn schemas(&self) -> SchemaSet<'_> {
        SchemaSet {
            codec: &self.codec,
            container: &self.container,
            scaler: self.scaler.as_ref().map(|s| s as &dyn ValidatingSchema),
            resampler: self.resampler.as_ref().map(|s| s as &dyn ValidatingSchema),
        }
    }

    /// Catalog with a representative subset of the options of the common codec, container,
    /// scaler and resampler libraries.
    pub fn builtin() -> Self {
        Self {
            codec: builtin_codec(),
            container: builtin_container(),
            scaler: Some(builtin_scaler()),
            resampler: Some(builtin_resampler()),
        }
    }
}

const STRICT: &[(&str, i64)] = &[
    ("very", 2),
    ("strict", 1),
    ("normal", 0),
    ("unofficial", -1),
    ("experimental", -2),
];

fn opt(name: &str, kind: OptionKind, usage: &[OptionUsage]) -> OptionSpec {
    OptionSpec::new(name, kind).usage(usage)
}

fn builtin_codec() -> SchemaTable {
    const CODEC_FLAGS: &[(&str, i64)] = &[
        ("unaligned", 0x1),
        ("mv4", 0x4),
        ("qpel", 0x10),
        ("loop", 0x800),
        ("gray", 0x2000),
        ("psnr", 0x8000),
        ("low_delay", 0x80000),
        ("global_header", 0x400000),
        ("bitexact", 0x800000),
    ];
    const DEBUG: &[(&str, i64)] = &[
        ("pict", 0x1),
        ("rc", 0x2),
        ("bitstream", 0x4),
        ("mb_type", 0x8),
        ("qp", 0x10),
        ("bugs", 0x1000),
        ("buffers", 0x8000),
        ("thread_ops", 0x10000),
    ];
    let av = &[Encoding, Decoding, Audio, Video];

    SchemaTable::new("AVCodecContext")
        .with_option(
            opt("b", OptionKind::Int64, &[Encoding, Audio, Video])
                .range(0.0, i64::MAX as f64),
        )
        .with_option(
            opt("flags", OptionKind::Flags, &[Encoding, Decoding, Audio, Video, Subtitle])
                .constants(CODEC_FLAGS),
        )
        .with_option(
            opt("g", OptionKind::Int, &[Encoding, Video])
                .range(i32::MIN as f64, i32::MAX as f64),
        )
        .with_option(
            opt("ar", OptionKind::Int, &[Encoding, Decoding, Audio])
                .range(0.0, i32::MAX as f64),
        )
        .with_option(
            opt("ac", OptionKind::Int, &[Encoding, Decoding, Audio])
                .range(0.0, i32::MAX as f64),
        )
        .with_option(
            opt("qmin", OptionKind::Int, &[Encoding, Video])
                .range(-1.0, 69.0),
        )
        .with_option(
            opt("qmax", OptionKind::Int, &[Encoding, Video])
                .range(-1.0, 1024.0),
        )
        .with_option(
            opt("bf", OptionKind::Int, &[Encoding, Video])
                .range(-1.0, 16.0),
        )
        .with_option(
            opt("time_base", OptionKind::Rational, av)
                .range(0.0, i32::MAX as f64),
        )
        .with_option(
            opt("aspect", OptionKind::Rational, &[Encoding, Video])
                .range(0.0, 10.0),
        )
        .with_option(opt("video_size", OptionKind::ImageSize, &[Decoding, Video]))
        .with_option(opt("pixel_format", OptionKind::PixelFmt, &[Decoding, Video]))
        .with_option(opt("sample_fmt", OptionKind::SampleFmt, &[Decoding, Audio]))
        .with_option(
            opt("threads", OptionKind::Int, av)
                .range(0.0, i32::MAX as f64)
                .constants(&[("auto", 0)]),
        )
        .with_option(
            opt("strict", OptionKind::Int, av)
                .range(-2.0, 2.0)
                .constants(STRICT),
        )
        .with_option(
            opt("debug", OptionKind::Flags, &[Encoding, Decoding, Audio, Video, Subtitle])
                .constants(DEBUG),
        )
        .with_option(
            opt("skip_initial_bytes", OptionKind::Int64, &[Decoding])
                .range(0.0, i64::MAX as f64),
        )
        .with_child(
            SchemaTable::new("libx264")
                .with_option(opt("preset", OptionKind::String, &[Encoding, Video]))
                .with_option(opt("tune", OptionKind::String, &[Encoding, Video]))
                .with_option(opt("profile", OptionKind::String, &[Encoding, Video]))
                .with_option(
                    opt("crf", OptionKind::Float, &[Encoding, Video])
                        .range(-1.0, 51.0),
                )
                .with_option(opt("x264-params", OptionKind::String, &[Encoding, Video])),
        )
        .with_child(
            SchemaTable::new("libopus").with_option(
                opt("application", OptionKind::Int, &[Encoding, Audio])
                    .range(2048.0, 2051.0)
                    .constants(&[("voip", 2048), ("audio", 2049), ("lowdelay", 2051)]),
            ),
        )
}

fn builtin_container() -> SchemaTable {
    const FFLAGS: &[(&str, i64)] = &[
        ("ignidx", 0x2),
        ("genpts", 0x4),
        ("igndts", 0x8),
        ("nofillin", 0x10),
        ("noparse", 0x20),
        ("nobuffer", 0x40),
        ("discardcorrupt", 0x100),
        ("bitexact", 0x400),
        ("sortdts", 0x10000),
        ("fastseek", 0x80000),
    ];
    const MOVFLAGS: &[(&str, i64)] = &[
        ("empty_moov", 0x1),
        ("frag_keyframe", 0x2),
        ("separate_moof", 0x10),
        ("faststart", 0x80),
        ("omit_tfhd_offset", 0x100),
    ];
    const RTSP_TRANSPORT: &[(&str, i64)] = &[
        ("udp", 0x1),
        ("tcp", 0x2),
        ("udp_multicast", 0x4),
        ("http", 0x8),
    ];
    let both = &[Encoding, Decoding];

    SchemaTable::new("AVFormatContext")
        .with_option(
            opt("probesize", OptionKind::Int64, &[Decoding])
                .range(32.0, i64::MAX as f64),
        )
        .with_option(
            opt("analyzeduration", OptionKind::Int64, &[Decoding])
                .range(0.0, i64::MAX as f64),
        )
        .with_option(opt("fflags", OptionKind::Flags, both).constants(FFLAGS))
        .with_option(
            opt("fdebug", OptionKind::Flags, both)
                .constants(&[("ts", 0x1)]),
        )
        .with_option(
            opt("avioflags", OptionKind::Flags, both)
                .constants(&[("direct", 0x8000)]),
        )
        .with_option(
            opt("max_delay", OptionKind::Int, both)
                .range(-1.0, i32::MAX as f64),
        )
        .with_option(
            opt("fpsprobesize", OptionKind::Int, &[Decoding])
                .range(-1.0, i32::MAX as f64 - 1.0),
        )
        .with_option(
            opt("strict", OptionKind::Int, both)
                .range(-2.0, 2.0)
                .constants(STRICT),
        )
        .with_option(
            opt("max_interleave_delta", OptionKind::Int64, &[Encoding])
                .range(0.0, i64::MAX as f64),
        )
        .with_option(opt("start_time_realtime", OptionKind::Int64, &[Encoding]))
        .with_child(
            SchemaTable::new("mov/mp4/ismv muxer")
                .with_option(
                    opt("movflags", OptionKind::Flags, &[Encoding])
                        .constants(MOVFLAGS),
                )
                .with_option(opt("brand", OptionKind::String, &[Encoding]))
                .with_option(
                    opt("frag_duration", OptionKind::Int, &[Encoding])
                        .range(0.0, i32::MAX as f64),
                ),
        )
        .with_child(
            SchemaTable::new("RTSP demuxer").with_option(
                opt("rtsp_transport", OptionKind::Flags, &[Decoding])
                    .constants(RTSP_TRANSPORT),
            ),
        )
}

fn builtin_scaler() -> SchemaTable {
    const SWS_FLAGS: &[(&str, i64)] = &[
        ("fast_bilinear", 0x1),
        ("bilinear", 0x2),
        ("bicubic", 0x4),
        ("experimental", 0x8),
        ("neighbor", 0x10),
        ("area", 0x20),
        ("bicublin", 0x40),
        ("gauss", 0x80),
        ("sinc", 0x100),
        ("lanczos", 0x200),
        ("spline", 0x400),
        ("print_info", 0x1000),
        ("full_chroma_int", 0x2000),
        ("full_chroma_inp", 0x4000),
        ("accurate_rnd", 0x40000),
        ("bitexact", 0x80000),
        ("error_diffusion", 0x800000),
    ];
    const SWS_DITHER: &[(&str, i64)] = &[
        ("auto", 1),
        ("bayer", 2),
        ("ed", 3),
        ("a_dither", 4),
        ("x_dither", 5),
    ];
    let vf = &[Video, Filtering];

    SchemaTable::new("SWScaler")
        .with_option(opt("sws_flags", OptionKind::Flags, vf).constants(SWS_FLAGS))
        .with_option(opt("srcw", OptionKind::Int, vf).range(1.0, i32::MAX as f64))
        .with_option(opt("srch", OptionKind::Int, vf).range(1.0, i32::MAX as f64))
        .with_option(opt("dstw", OptionKind::Int, vf).range(1.0, i32::MAX as f64))
        .with_option(opt("dsth", OptionKind::Int, vf).range(1.0, i32::MAX as f64))
        .with_option(opt("src_format", OptionKind::PixelFmt, vf))
        .with_option(opt("dst_format", OptionKind::PixelFmt, vf))
        .with_option(opt("src_range", OptionKind::Bool, vf))
        .with_option(opt("dst_range", OptionKind::Bool, vf))
        .with_option(opt("param0", OptionKind::Double, vf))
        .with_option(opt("param1", OptionKind::Double, vf))
        .with_option(
            opt("threads", OptionKind::Int, vf)
                .range(0.0, i32::MAX as f64)
                .constants(&[("auto", 0)]),
        )
        .with_option(
            opt("sws_dither", OptionKind::Int, vf)
                .range(0.0, 6.0)
                .constants(SWS_DITHER),
        )
}

fn builtin_resampler() -> SchemaTable {
    const DITHER_METHOD: &[(&str, i64)] = &[
        ("rectangular", 1),
        ("triangular", 2),
        ("triangular_hp", 3),
        ("lipshitz", 65),
        ("shibata", 66),
    ];
    let af = &[Audio, Filtering];

    SchemaTable::new("SWResampler")
        .with_option(opt("isr", OptionKind::Int, af).range(0.0, i32::MAX as f64))
        .with_option(opt("osr", OptionKind::Int, af).range(0.0, i32::MAX as f64))
        .with_option(opt("isf", OptionKind::SampleFmt, af))
        .with_option(opt("osf", OptionKind::SampleFmt, af))
        .with_option(opt("filter_size", OptionKind::Int, af).range(0.0, 256.0))
        .with_option(opt("phase_shift", OptionKind::Int, af).range(0.0, 24.0))
        .with_option(opt("linear_interp", OptionKind::Bool, af))
        .with_option(opt("cutoff", OptionKind::Double, af).range(0.0, 1.0))
        .with_option(
            opt("async", OptionKind::Float, af)
                .range(0.0, i32::MAX as f64),
        )
        .with_option(opt("first_pts", OptionKind::Int64, af))
        .with_option(
            opt("rematrix_volume", OptionKind::Double, af)
                .range(-1000.0, 1000.0),
        )
        .with_option(
            opt("resampler", OptionKind::Int, af)
                .range(0.0, 1.0)
                .constants(&[("swr", 0), ("soxr", 1)]),
        )
        .with_option(
            opt("dither_method", OptionKind::Int, af)
                .range(0.0, 71.0)
                .constants(DITHER_METHOD),
        )
        .with_option(
            opt("matrix_encoding", OptionKind::Int, af)
                .range(0.0, 2.0)
                .constants(&[("none", 0), ("dolby", 1), ("dplii", 2)]),
        )
}

#[cfg(test)]
#[path = "../../tests/unit/options/catalog.rs"]
mod tests;
