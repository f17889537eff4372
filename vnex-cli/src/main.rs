//! vnex CLI - game asset extraction.
//!
//! Lists, extracts and decodes resources from visual-novel engine formats
//! (IGA archives, GXT texture containers, ERI images).

mod commands;

use clap::{Parser, Subcommand};
use commands::{cmd_decode, cmd_detect, cmd_extract, cmd_list};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vnex")]
#[command(author, version, about = "Game asset extraction for visual-novel engine formats")]
#[command(long_about = "
vnex decodes game resource containers into plain files and images.
Supported formats: innocent-grey/iga, playstation/gxt, entis/eri

Examples:
  vnex list data.iga
  vnex list --json data.iga
  vnex extract data.iga textures.gxt -o out/
  vnex decode picture.eri -o picture.ppm
  vnex detect mystery.dat
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of an archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Extract files from one or more archives
    #[command(alias = "x")]
    Extract {
        /// Archive files to extract
        archives: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Disable progress bars
        #[arg(short = 'q', long)]
        no_progress: bool,
    },

    /// Decode an image file to PGM/PPM
    #[command(alias = "d")]
    Decode {
        /// Image file to decode
        image: PathBuf,

        /// Output file (extension chosen from the pixel format if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the format of a file
    Detect {
        /// File to probe
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { archive, json } => cmd_list(&archive, json),
        Commands::Extract {
            archives,
            output,
            no_progress,
        } => cmd_extract(&archives, &output, !no_progress),
        Commands::Decode { image, output } => cmd_decode(&image, output.as_deref()),
        Commands::Detect { file } => cmd_detect(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
