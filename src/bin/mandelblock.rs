use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use env_logger::{Builder, Env};
use log::info;
use structopt::StructOpt;

use mandelblock::complex::c;
use mandelblock::painter::{AsciiPainter, Greyscale, IValuePainter, Painter, Rainbow};
use mandelblock::{generate_as, Geometry, Representation, Resolution};

#[derive(Debug, Clone, Copy)]
enum Colors {
    Rainbow,
    Greyscale,
}

impl FromStr for Colors {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rainbow" => Ok(Self::Rainbow),
            "greyscale" | "grayscale" => Ok(Self::Greyscale),
            _ => Err(format!("unknown color scale {:?}", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "mandelblock", about = "Escape-time Mandelbrot generator")]
struct Options {
    /// Numeric representation: f32, f64, fixed64 or fixed32
    #[structopt(long, default_value = "fixed64")]
    repr: Representation,

    #[structopt(long, default_value = "80")]
    width: usize,

    #[structopt(long, default_value = "40")]
    height: usize,

    /// Iteration limit
    #[structopt(long, default_value = "1000000")]
    limit: u32,

    #[structopt(long, default_value = "-2", allow_hyphen_values = true)]
    origin_re: f64,

    #[structopt(long, default_value = "-2", allow_hyphen_values = true)]
    origin_im: f64,

    #[structopt(long, default_value = "4", allow_hyphen_values = true)]
    x_extent_re: f64,

    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    x_extent_im: f64,

    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    y_extent_re: f64,

    #[structopt(long, default_value = "4", allow_hyphen_values = true)]
    y_extent_im: f64,

    /// Worker threads; 0 generates on the main thread
    #[structopt(long, default_value = "0")]
    threads: usize,

    /// Write a PNG here instead of printing ASCII
    #[structopt(long, parse(from_os_str))]
    png: Option<PathBuf>,

    /// Color scale for PNG output: rainbow or greyscale
    #[structopt(long, default_value = "rainbow")]
    colors: Colors,

    /// Count mapped to the top of the color scale (defaults to the limit)
    #[structopt(long)]
    max_color: Option<u32>,
}

impl Options {
    fn geometry(&self) -> Geometry<f64> {
        Geometry::new(
            c(self.origin_re, self.origin_im),
            c(self.x_extent_re, self.x_extent_im),
            c(self.y_extent_re, self.y_extent_im),
            Resolution::new(self.width, self.height),
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let opts = Options::from_args();
    let geometry = opts.geometry();
    info!(
        "{} {}x{} points, limit {}, threads {}",
        opts.repr, opts.width, opts.height, opts.limit, opts.threads
    );

    let start = Instant::now();
    let map = generate_as(opts.repr, &geometry, opts.limit, opts.threads)?;
    info!("generated in {:?}", start.elapsed());

    match &opts.png {
        Some(path) => {
            let max = opts.max_color.unwrap_or(opts.limit);
            let img = match opts.colors {
                Colors::Rainbow => IValuePainter::new(Rainbow, max).paint(&map),
                Colors::Greyscale => IValuePainter::new(Greyscale, max).paint(&map),
            };
            img.save(path)?;
            info!("wrote {}", path.display());
        }
        None => print!("{}", AsciiPainter.paint(&map)),
    }
    Ok(())
}
