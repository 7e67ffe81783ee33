use std::{error::Error, fs::File, io};

use clap::Parser;
use log::info;
use tubechain::{
    geometry::helix::{build_helix, HelixParams},
    report::{chain_records, write_csv, write_json, write_text},
};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

#[derive(Debug, clap::Parser)]
#[command(
    name = "helix",
    about = "Print the capsule placements of a helical tube chain..."
)]
struct HelixCli {
    #[arg(short = 'r', long = "radius", default_value_t = 60.0)]
    pub radius: f64,

    #[arg(short = 't', long = "tube-radius", default_value_t = 5.0)]
    pub tube_radius: f64,

    #[arg(short = 's', long = "radial-segments", default_value_t = 24)]
    pub radial_segments: u32,

    #[arg(short = 'n', long = "turns", default_value_t = 1.0)]
    pub turns: f64,

    #[arg(long = "height", default_value_t = 300.0)]
    pub height: f64,

    #[arg(long = "counterclockwise")]
    pub counterclockwise: bool,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write here instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
}

impl HelixCli {
    fn params(&self) -> HelixParams {
        HelixParams {
            radius: self.radius,
            tube_radius: self.tube_radius,
            radial_segments: self.radial_segments,
            turns: self.turns,
            height: self.height,
            clockwise: !self.counterclockwise,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = HelixCli::parse();

    let chain = build_helix(&args.params())?;
    info!("Built helix chain of {} capsules", chain.len());
    let records = chain_records(&chain);

    let out: Box<dyn io::Write> = match &args.output {
        Some(path) => {
            info!("Writing {:?} output to {}", args.format, path);
            Box::new(File::create(path)?)
        }
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        Format::Text => write_text(&records, out),
        Format::Csv => write_csv(&records, out),
        Format::Json => write_json(&records, out),
    }
}
