extern crate clap;
extern crate env_logger;
extern crate log;
extern crate num_cpus;
extern crate rfunc;

use clap::{App, Arg, ArgMatches};
use env_logger::Env;
use log::info;
use rfunc::field::{builtin, FIELD_NAMES};
use rfunc::{Color, DomainRect, Error, Gradient, RenderSet};
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_extent(s: &str) -> Result<(), String> {
    match parse_pair::<f64>(s, ',') {
        Some((w, h)) if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() => Ok(()),
        Some(_) => Err("Extent must be positive".to_string()),
        None => Err("Could not parse extent".to_string()),
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    validate_pair::<u16>(s, 'x', "Could not parse channel size")?;
    match parse_pair::<u16>(s, 'x') {
        Some((w, h)) if w >= 2 && h >= 2 => Ok(()),
        _ => Err("Channel size must be at least 2x2".to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTTOP: &str = "lefttop";
const EXTENT: &str = "extent";
const FIELD: &str = "field";
const FIRST: &str = "first-color";
const SECOND: &str = "second-color";
const THREADS: &str = "threads";
const REPALETTE: &str = "repalette";
const CHANNELS: &str = "channels";

fn args<'a>(default_threads: &'a str) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("rfunc")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders the generalized normals of an implicit function")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file for the four channels, tiled two by two (.png or .pnm)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("200x200")
                .validator(|s| validate_size(&s))
                .help("Size of each channel"),
        )
        .arg(
            Arg::with_name(LEFTTOP)
                .required(false)
                .long(LEFTTOP)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-10,-10")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left top corner"))
                .help("Left top corner of the sampled region"),
        )
        .arg(
            Arg::with_name(EXTENT)
                .required(false)
                .long(EXTENT)
                .short("e")
                .takes_value(true)
                .default_value("20,20")
                .validator(|s| validate_extent(&s))
                .help("Width and height of the sampled region"),
        )
        .arg(
            Arg::with_name(FIELD)
                .required(false)
                .long(FIELD)
                .short("f")
                .takes_value(true)
                .possible_values(FIELD_NAMES)
                .default_value("complex")
                .help("Built-in field to render"),
        )
        .arg(
            Arg::with_name(FIRST)
                .required(false)
                .long(FIRST)
                .short("a")
                .takes_value(true)
                .default_value("#000000")
                .validator(|s| Color::from_str(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("Color for a normal component of -1 (#rrggbb[aa] or r,g,b[,a])"),
        )
        .arg(
            Arg::with_name(SECOND)
                .required(false)
                .long(SECOND)
                .short("b")
                .takes_value(true)
                .default_value("#ffffff")
                .validator(|s| Color::from_str(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("Color for a normal component of +1 (#rrggbb[aa] or r,g,b[,a])"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Total number of threads to use in renderer"),
        )
        .arg(
            Arg::with_name(REPALETTE)
                .long(REPALETTE)
                .help("Render black to white, then recolor in place instead of rendering again"),
        )
        .arg(
            Arg::with_name(CHANNELS)
                .required(false)
                .long(CHANNELS)
                .takes_value(true)
                .help("Directory to also write nx.png, ny.png, nz.png and nw.png into"),
        )
        .get_matches()
}

// Validators have already run, so the lookups below only fail if an
// argument without a default was left out.
fn value<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.value_of(name).unwrap_or_default()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) =
        parse_pair::<u16>(value(matches, SIZE), 'x').ok_or(Error::EmptyRaster)?;
    let (left, top) = parse_pair::<f64>(value(matches, LEFTTOP), ',')
        .ok_or(Error::InvalidRegion)?;
    let (w, h) = parse_pair::<f64>(value(matches, EXTENT), ',')
        .ok_or(Error::InvalidRegion)?;
    let rect = DomainRect::new(left, top, w, h)?;
    let field = builtin(value(matches, FIELD))?;
    let gradient = Gradient::new(
        Color::from_str(value(matches, FIRST))?,
        Color::from_str(value(matches, SECOND))?,
    );
    let threads = usize::from_str(value(matches, THREADS)).unwrap_or(1);

    let mut scene = RenderSet::new(field, rect, width as usize, height as usize, threads)?;

    let start = Instant::now();
    if matches.is_present(REPALETTE) {
        scene.render_all()?;
        scene.repalette_all(gradient)?;
    } else {
        scene.update_gradient(gradient)?;
    }
    info!("Rendered {}x{} channels in {:?}", width, height, start.elapsed());

    if let Some(dir) = matches.value_of(CHANNELS) {
        std::fs::create_dir_all(dir)?;
        scene.save_channels(dir)?;
    }
    scene.save_composite(value(matches, OUTPUT))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let default_threads = num_cpus::get().to_string();
    let matches = args(&default_threads);
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
