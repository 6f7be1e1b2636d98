// main.rs      animgif command
//
// Copyright (c) 2026  Douglas Lau
//
#![forbid(unsafe_code)]

use animgif::block::DisposalMethod;
use animgif::{Frame, FrameBytes};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Prefix for GIF data URIs
const DATA_URI_PREFIX: &str = "data:image/gif;base64,";

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    let matches = create_app().get_matches();
    let mut builder = env_logger::builder();
    builder.format_timestamp(None);
    let verbose = matches.is_present("verbose")
        || matches
            .subcommand()
            .1
            .map_or(false, |m| m.is_present("verbose"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    let mut out = StandardStream::stderr(ColorChoice::Auto);
    let res = match matches.subcommand() {
        ("wrap", Some(matches)) => wrap(&mut out, matches),
        _ => unreachable!(),
    };
    if let Err(e) = &res {
        let mut red = ColorSpec::new();
        red.set_fg(Some(Color::Red)).set_intense(true);
        out.set_color(&red)?;
        writeln!(out, "error: {}", e)?;
    }
    out.reset()?;
    res
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("animgif")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("Animated GIF builder")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("log encoder details"),
        )
        .subcommand(
            SubCommand::with_name("wrap")
                .about("Wrap raw pixel frames into a GIF")
                .arg(
                    Arg::with_name("size")
                        .short("s")
                        .long("size")
                        .takes_value(true)
                        .required(true)
                        .help("frame size (WxH)"),
                )
                .arg(
                    Arg::with_name("channels")
                        .short("c")
                        .long("channels")
                        .takes_value(true)
                        .possible_values(&["3", "4"])
                        .default_value("4")
                        .help("channels per pixel (RGB or RGBA)"),
                )
                .arg(
                    Arg::with_name("delay")
                        .short("d")
                        .long("delay")
                        .takes_value(true)
                        .default_value("10")
                        .help("frame delay (centiseconds)"),
                )
                .arg(
                    Arg::with_name("disposal")
                        .short("p")
                        .long("disposal")
                        .takes_value(true)
                        .default_value("1")
                        .help("disposal method (0-7)"),
                )
                .arg(
                    Arg::with_name("repeat")
                        .short("r")
                        .long("repeat")
                        .takes_value(true)
                        .default_value("0")
                        .help("repeat count (0 = forever)"),
                )
                .arg(
                    Arg::with_name("screen")
                        .long("screen")
                        .takes_value(true)
                        .help("logical screen size (WxH)"),
                )
                .arg(
                    Arg::with_name("data-uri")
                        .short("u")
                        .long("data-uri")
                        .help("write a base64 data URI"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .help("output file (default stdout)"),
                )
                .arg(
                    Arg::with_name("frames")
                        .required(true)
                        .min_values(1)
                        .help("raw pixel file(s), one per frame"),
                ),
        )
}

/// Parse a size argument (WxH)
fn parse_size(size: &str) -> Result<(u32, u32), Box<dyn Error>> {
    match size.split_once(|c: char| c == 'x' || c == 'X') {
        Some((w, h)) => Ok((w.trim().parse()?, h.trim().parse()?)),
        None => Err(format!("invalid size: {}", size).into()),
    }
}

/// Get a required numeric argument
fn value_of<T>(matches: &ArgMatches, name: &str) -> Result<T, Box<dyn Error>>
where
    T: std::str::FromStr,
    T::Err: Error + 'static,
{
    match matches.value_of(name) {
        Some(v) => Ok(v.parse()?),
        None => Err(format!("missing {}", name).into()),
    }
}

/// Handle wrap subcommand
fn wrap(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let (width, height) = parse_size(matches.value_of("size").unwrap_or(""))?;
    let (screen_width, screen_height) = match matches.value_of("screen") {
        Some(screen) => parse_size(screen)?,
        None => (width, height),
    };
    let channels: usize = value_of(matches, "channels")?;
    let delay: u32 = value_of(matches, "delay")?;
    let disposal: u8 = value_of(matches, "disposal")?;
    let repeat: u32 = value_of(matches, "repeat")?;
    let mut frames = vec![];
    for path in matches.values_of_os("frames").into_iter().flatten() {
        let buffer = fs::read(path)?;
        frames.push(Frame::from_buffer(
            width, height, channels, &buffer, delay, disposal,
        )?);
    }
    let encoded = animgif::encode_frames(&frames)?;
    let gif =
        animgif::assemble(&encoded, repeat, screen_width, screen_height)?;
    show_frames(out, &encoded, width, height)?;
    let data = if matches.is_present("data-uri") {
        let mut uri = DATA_URI_PREFIX.to_string();
        uri.push_str(&STANDARD.encode(&gif));
        uri.into_bytes()
    } else {
        gif
    };
    match matches.value_of_os("output") {
        Some(path) => File::create(path)?.write_all(&data)?,
        None => io::stdout().write_all(&data)?,
    }
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    out.set_color(&bold)?;
    write!(out, "GIF89a, frames: {}, repeat: ", frames.len())?;
    if repeat == 0 {
        write!(out, "∞")?;
    } else {
        write!(out, "{}", repeat)?;
    }
    writeln!(out, ", {} bytes", data.len())?;
    Ok(())
}

/// Show a table of encoded frames
fn show_frames(
    out: &mut StandardStream,
    frames: &[FrameBytes],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let mut red = ColorSpec::new();
    red.set_fg(Some(Color::Red)).set_intense(true);
    let frame_digits = digits(frames.len()).max(3);
    let size = format!("{}x{}", width, height);
    let size_digits = size.len().max(4);
    out.set_color(&yellow)?;
    write!(out, "{:>w$}", "Fr#", w = frame_digits)?;
    write!(out, "  Delay Disp")?;
    write!(out, " {:>w$}", "Size", w = size_digits)?;
    writeln!(out, " Clrs  Bytes")?;
    for (number, frame) in frames.iter().enumerate() {
        let gc = frame.graphic_control();
        out.set_color(&bold)?;
        write!(out, "{:>w$}", number, w = frame_digits)?;
        let d = gc.delay_time_cs();
        if d == 0 {
            out.set_color(&dflt)?;
        }
        write!(out, " {:6.2}", d as f32 / 100f32)?;
        let disp = match gc.disposal_method() {
            DisposalMethod::NoAction => "none",
            DisposalMethod::Keep => "keep",
            DisposalMethod::Background => "bg",
            DisposalMethod::Previous => "prev",
            DisposalMethod::Reserved(_) => "res",
        };
        out.set_color(match disp {
            "none" => &dflt,
            "res" => &red,
            _ => &bold,
        })?;
        write!(out, " {:>4}", disp)?;
        out.set_color(&dflt)?;
        write!(out, " {:>w$}", size, w = size_digits)?;
        out.set_color(&bold)?;
        write!(out, " {:4}", frame.color_table_len())?;
        out.set_color(&dflt)?;
        writeln!(out, " {:6}", frame.bytes().len())?;
    }
    Ok(())
}

/// Calculate digits in a number
fn digits(v: usize) -> usize {
    match v {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        1000..=9999 => 4,
        _ => 5,
    }
}
