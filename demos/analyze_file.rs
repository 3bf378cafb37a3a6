//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--highpass HZ] [--lowpass HZ]
//!       [--bandpass LOW HIGH] [--no-tempo] [--json] <file>
//!
//! Multi-channel audio is averaged down to mono before analysis.

use prism_dsp::{analyze_audio, AnalysisConfig, FeatureData, FilterSettings};
use std::env;
use std::fs::File;
use symphonia::core::audio::SampleBuffer as DecodedBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;

fn decode_audio_file(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = std::path::Path::new(path).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or("No supported audio track")?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or("Unknown sample rate")?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut mono: Vec<f32> = Vec::new();
    let mut interleaved: Option<DecodedBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Box::new(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let buf = interleaved
                    .get_or_insert_with(|| DecodedBuffer::new(decoded.capacity() as u64, spec));
                if buf.capacity() < decoded.capacity() * channels {
                    *buf = DecodedBuffer::new(decoded.capacity() as u64, spec);
                }
                buf.copy_interleaved_ref(decoded);
                mono.extend(
                    buf.samples()
                        .chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                );
            }
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                // Corrupted packet
                continue;
            }
            Err(e) => return Err(Box::new(e)),
        }
    }

    Ok((mono, sample_rate))
}

fn parse_cutoff(args: &mut Vec<String>, flag: &str) -> Result<i32, Box<dyn std::error::Error>> {
    if args.is_empty() {
        return Err(format!("{flag} requires a value").into());
    }
    Ok(args.remove(0).parse::<i32>()?)
}

fn summarize(data: &FeatureData) -> String {
    match data {
        FeatureData::Series(values) => {
            let (min, max) = values
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            format!("{} values, range [{:.3}, {:.3}]", values.len(), min, max)
        }
        FeatureData::Matrix(rows) => format!(
            "{} × {}",
            rows.len(),
            rows.first().map_or(0, |r| r.len())
        ),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut filters = FilterSettings::disabled();
    let mut config = AnalysisConfig::default();
    let mut path: Option<String> = None;

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--no-tempo" => config.compute_tempo = false,
            "--highpass" => filters.highpass = parse_cutoff(&mut args, "--highpass")?,
            "--lowpass" => filters.lowpass = parse_cutoff(&mut args, "--lowpass")?,
            "--bandpass" => {
                filters.bandpass_low = parse_cutoff(&mut args, "--bandpass")?;
                filters.bandpass_high = parse_cutoff(&mut args, "--bandpass")?;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_file [--highpass HZ] [--lowpass HZ] [--bandpass LOW HIGH] \
                     [--no-tempo] [--json] <file>"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let (samples, sample_rate) = decode_audio_file(&path)?;
    let result = analyze_audio(&samples, sample_rate, filters, config)?;

    if json {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    println!("Analysis Results: {}", path);
    println!(
        "  Duration: {:.2} s at {} Hz",
        result.metadata.duration_seconds, result.metadata.sample_rate
    );
    for stage in &result.metadata.filters_applied {
        match stage.high_hz {
            Some(high) => println!(
                "  Filter: {:?} {:.0}-{:.0} Hz",
                stage.filter_type, stage.low_hz, high
            ),
            None => println!("  Filter: {:?} {:.0} Hz", stage.filter_type, stage.low_hz),
        }
    }
    for feature in result.iter() {
        println!("  {:<20} {}", feature.kind.title(), summarize(&feature.data));
    }
    if !result.metadata.flags.is_empty() {
        println!("  Flags: {:?}", result.metadata.flags);
    }
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    Ok(())
}
