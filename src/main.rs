use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use colorwheel::{
    compute_geometry, darken, lighten, paint, Color, ColorFormat, PickerController, PixelBuffer,
    PointerEvent, RasterSurface, Sweep,
};

// CLI arg definition
#[derive(Parser, Debug)]
#[command(about = "Paint a color wheel and pick colors from it")]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a wheel to a PNG
    Paint {
        #[arg(short, long, value_name = "1-8192", value_parser = size_range(), default_value("300"))]
        size: u32,

        /// Defaults to the size
        #[arg(long, value_parser = size_range())]
        height: Option<u32>,

        #[arg(long, default_value("0"), allow_negative_numbers = true)]
        start: i32,

        #[arg(long, default_value("360"), allow_negative_numbers = true)]
        end: i32,

        #[arg(long)]
        counter_clockwise: bool,

        #[arg(short, long, default_value("wheel.png"))]
        output: PathBuf,
    },

    /// Replay pointer events on a wheel and print each picked color
    Pick {
        /// A wheel PNG to sample; a fresh wheel is painted otherwise
        #[arg(short, long, conflicts_with("size"))]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "1-8192", value_parser = size_range(), default_value("300"))]
        size: u32,

        /// Add N random clicks
        #[arg(short, long, value_name = "N")]
        random: Option<usize>,

        #[arg(short, long, value_name = "KEY", requires("random"), default_value("0"))]
        key: u64,

        /// press:X,Y  move:X,Y  release:X,Y  click:X,Y
        events: Vec<PointerEvent>,
    },

    /// Re-encode a color
    Convert {
        color: Color,

        #[arg(short, long, value_enum, default_value_t = Format::Hex)]
        to: Format,
    },

    /// Scale a color's channels up by PERCENT
    Lighten {
        color: Color,

        #[arg(allow_negative_numbers = true)]
        percent: f64,

        #[arg(short, long, value_enum, default_value_t = Format::Hex)]
        to: Format,
    },

    /// Scale a color's channels down by PERCENT
    Darken {
        color: Color,

        #[arg(allow_negative_numbers = true)]
        percent: f64,

        #[arg(short, long, value_enum, default_value_t = Format::Hex)]
        to: Format,
    },
}

// Caps a square RGBA raster at 256 MiB
const MAX_SIZE: u32 = 8192;

fn size_range() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_SIZE))
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Hex,
    Rgb,
    Hsl,
}

impl From<Format> for ColorFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Hex => ColorFormat::Hex,
            Format::Rgb => ColorFormat::Rgb,
            Format::Hsl => ColorFormat::Hsl,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> colorwheel::Result<()> {
    match command {
        Command::Paint { size, height, start, end, counter_clockwise, output } => {
            let mut surface = PixelBuffer::new(size, height.unwrap_or(size));
            let sweep = if counter_clockwise { Sweep::CounterClockwise } else { Sweep::Clockwise };
            let geometry = compute_geometry(surface.width(), surface.height())
                .with_angles(start, end)
                .with_sweep(sweep);

            paint(&mut surface, &geometry);
            surface.save(&output)?;
            info!(path = %output.display(), "wrote wheel");
        }

        Command::Pick { input, size, random, key, mut events } => {
            let mut picker = match input {
                Some(path) => PickerController::from_painted(PixelBuffer::open(&path)?),
                None => PickerController::new(PixelBuffer::new(size, size)),
            };
            let (width, height) = (picker.surface().width(), picker.surface().height());

            // Random clicks from a seeded stream
            if let Some(count) = random.filter(|_| width > 0 && height > 0) {
                let mut rng = ChaCha20Rng::seed_from_u64(key);
                events.extend((0..count).map(|_| PointerEvent::Click {
                    x: rng.gen_range(0..i64::from(width)),
                    y: rng.gen_range(0..i64::from(height)),
                }));
            }

            picker.subscribe(|picked| println!("{picked}"));
            for event in events {
                picker.handle(event);
            }
        }

        Command::Convert { color, to } => {
            println!("{}", color.convert(to.into()));
        }

        Command::Lighten { color, percent, to } => {
            println!("{}", lighten(&color, percent, to.into()));
        }

        Command::Darken { color, percent, to } => {
            println!("{}", darken(&color, percent, to.into()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(&["colorwheel", "paint", "--size", "200000"] ; "paint size too large")]
    #[test_case(&["colorwheel", "paint", "--size", "0"] ; "paint size zero")]
    #[test_case(&["colorwheel", "paint", "--height", "9000"] ; "paint height too large")]
    #[test_case(&["colorwheel", "pick", "--size", "200000"] ; "pick size too large")]
    fn oversized_surfaces_are_rejected(argv: &[&str]) {
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn sizes_within_range_parse() {
        let args = Args::try_parse_from(["colorwheel", "paint", "--size", "8192", "--height", "1"]).unwrap();
        let Command::Paint { size, height, .. } = args.command else { panic!("expected paint") };
        assert_eq!((size, height), (8192, Some(1)));
    }
}
