use clap::{Parser, Subcommand};
use env_logger::Builder;
use lazygal::cancel::CancelToken;
use lazygal::gallery::Gallery;
use lazygal::{config, output, scan};
use log::{Level, LevelFilter};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lazygal")]
#[command(about = "Keep previews, thumbnails and EXIF sidecars in sync with a photo directory")]
#[command(long_about = "\
Keep previews, thumbnails and EXIF sidecars in sync with a photo directory

Derivatives are generated only when missing and removed when their source
image is gone:

  photos/
  ├── lazygal.toml           # Config (optional)
  ├── a.jpg                  # Source images (jpg, jpeg, png, gif, tif, tiff)
  ├── previews/
  │   ├── a.jpg              # Scaled into the preview box (absent if a.jpg fits)
  │   └── a.jpg.exif         # EXIF dump, or a.jpg.noexif when there is none
  ├── thumbnails/
  │   └── a.jpg              # Centered square crop
  └── feed/
      └── a.jpg              # Small square crop (feed = true)

Run 'lazygal gen-config' to generate a documented lazygal.toml.")]
#[command(version)]
struct Cli {
    /// Log every processing step
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Directory holding the source images
    dir: PathBuf,

    /// Where previews/, thumbnails/ and feed/ are written (defaults to DIR)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Config file to use instead of DIR/lazygal.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process images on a worker pool
    #[arg(long)]
    parallel: bool,

    /// Rewrite sideways jpeg sources upright before processing
    #[arg(long)]
    rotate: bool,

    /// Also generate feed thumbnails
    #[arg(long)]
    feed: bool,

    /// Write the resulting gallery as JSON to this file
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate missing derivatives and remove orphaned ones
    Build(BuildArgs),
    /// List the images that would be processed
    Check {
        /// Directory holding the source images
        dir: PathBuf,
    },
    /// Print a stock lazygal.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Build(args) => {
            let mut gallery_config = match &args.config {
                Some(path) => config::load_config_file(path)?,
                None => config::load_config(&args.dir)?,
            };
            gallery_config.parallel |= args.parallel;
            gallery_config.rotate |= args.rotate;
            gallery_config.feed |= args.feed;

            let output_dir = args.output.clone().unwrap_or_else(|| args.dir.clone());
            let mut gallery = Gallery::with_output_dir(&args.dir, &output_dir, gallery_config);

            let cancel = CancelToken::new();
            let handler_token = cancel.clone();
            ctrlc::set_handler(move || {
                handler_token.cancel();
            })?;

            println!("==> Building {}", args.dir.display());
            gallery.build(&cancel);
            output::print_build_output(&gallery.snapshot(), cli.verbose);

            if let Some(path) = &args.manifest {
                gallery.write_snapshot(path)?;
                println!("==> Manifest written to {}", path.display());
            }
        }
        Command::Check { dir } => {
            let gallery_config = config::load_config(&dir)?;
            println!("==> Checking {}", dir.display());
            // Never rename during a check
            let outcome = scan::scan_directory(&dir, false);
            output::print_scan_output(&outcome, &dir);
            if gallery_config.lower_case_names {
                println!("==> lower_case_names is on: build will rename mixed-case files");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Warnings only from dependencies; this crate at `warn`, or `debug` with
/// `--verbose`. `RUST_LOG` still applies on top.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            match record.level() {
                Level::Error | Level::Warn => writeln!(
                    buf,
                    "[{} {} {}] {}",
                    name,
                    record.level(),
                    record.target(),
                    record.args()
                ),
                _ => writeln!(buf, "[{}] {}", name, record.args()),
            }
        })
        .init();
}
