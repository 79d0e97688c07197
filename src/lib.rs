//! Uniset: uniform dataset extraction for representation learning.
//!
//! Uniset normalizes heterogeneous image datasets (synthetic multi-view
//! renders, annotated bird photographs, vehicle categories, face archives,
//! animal-face folders) into one uniform in-memory record of aligned,
//! fixed-size images plus per-sample labels. Each dataset keeps its own
//! reader for its raw layout; every reader emits the same [`Record`].
//!
//! # Modules
//!
//! - [`record`]: the uniform output record all readers produce
//! - [`readers`]: one reader per supported dataset
//! - [`registry`]: dataset-name resolution
//! - [`geometry`]: square-crop derivation and keypoint remapping
//! - [`landmarks`]: the injected face-landmark detection capability
//! - [`attributes`]: binary attribute vectors and rule classification
//! - [`mat5`]: the MAT container reader behind the bird-part dataset
//! - [`config`]: downstream training configuration (consumed interface)
//! - [`error`]: error types for uniset operations

pub mod attributes;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod mat5;
pub mod readers;
pub mod record;
pub mod registry;

use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ndarray_npy::NpzWriter;
use tracing::warn;

use crate::landmarks::{Detector, NullAlignment};
use crate::readers::{
    AfhqOptions, AfhqReader, AttrPairOptions, AttrPairReader, Cars3dReader, CelebAOptions,
    CelebAReader, CubOptions, CubReader, Reader, Split,
};
use crate::registry::DatasetKind;

pub use error::UnisetError;
pub use record::{Content, Record};

/// The uniset CLI application.
#[derive(Parser)]
#[command(name = "uniset")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Extract a dataset into the uniform record format.
    Extract(ExtractArgs),
    /// List the supported dataset names.
    Datasets,
}

/// Arguments for the extract subcommand.
#[derive(clap::Args)]
struct ExtractArgs {
    /// Dataset name (see 'uniset datasets').
    dataset: String,

    /// Root directory of the raw dataset.
    #[arg(long)]
    base_dir: PathBuf,

    /// Where to write the extracted record (.npz archive).
    #[arg(long)]
    out: PathBuf,

    /// Dataset split ('train' or 'val').
    #[arg(long, default_value = "train")]
    split: String,

    /// Square edge length for resized outputs.
    #[arg(long)]
    img_size: Option<u32>,

    /// Center-crop window.
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    crop_size: Option<Vec<u32>>,

    /// Output image size.
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    target_size: Option<Vec<u32>>,

    /// Cap on the number of sampled images (draws with replacement).
    #[arg(long)]
    n_images: Option<usize>,

    /// RNG seed for subsampling.
    #[arg(long)]
    seed: Option<u64>,
}

/// Run the uniset CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), UnisetError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract(args)) => run_extract(args),
        Some(Commands::Datasets) => {
            for kind in DatasetKind::ALL {
                println!("{}", kind.name());
            }
            Ok(())
        }
        None => {
            println!("uniset {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Uniform dataset extraction for representation learning.");
            println!();
            println!("Run 'uniset --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the extract subcommand.
fn run_extract(args: ExtractArgs) -> Result<(), UnisetError> {
    let kind = registry::resolve(&args.dataset)?;

    let reader = match kind {
        DatasetKind::Cars3d => Reader::Cars3d(Cars3dReader::new(&args.base_dir)),
        DatasetKind::Cub => {
            let mut opts = CubOptions {
                split: parse_split(&args.split)?,
                ..CubOptions::default()
            };
            if let Some(size) = args.img_size {
                opts.img_size = size;
            }
            Reader::Cub(CubReader::new(&args.base_dir, opts))
        }
        DatasetKind::Pascal3d => {
            return Err(UnisetError::InvalidOption(
                "pascal3d needs an injected vehicle-image source; drive it through the \
                 library API instead of the CLI"
                    .to_string(),
            ));
        }
        DatasetKind::CelebA => {
            let mut opts = CelebAOptions {
                n_images: args.n_images,
                seed: args.seed,
                ..CelebAOptions::default()
            };
            if let Some(size) = pair(&args.crop_size)? {
                opts.crop_size = size;
            }
            if let Some(size) = pair(&args.target_size)? {
                opts.target_size = size;
            }
            // Without a wired-in aligner every landmark row stays at the
            // zero sentinel.
            warn!("no landmark backend configured; landmark rows will be zero");
            let detector = Detector::new(Box::new(NullAlignment));
            Reader::CelebA(CelebAReader::new(&args.base_dir, opts, detector))
        }
        DatasetKind::BeardGlasses => {
            let mut opts = AttrPairOptions::default();
            if let Some(size) = pair(&args.crop_size)? {
                opts.crop_size = size;
            }
            if let Some(size) = pair(&args.target_size)? {
                opts.target_size = size;
            }
            Reader::BeardGlasses(AttrPairReader::new(&args.base_dir, opts))
        }
        DatasetKind::Afhq => {
            let mut opts = AfhqOptions {
                split: parse_split(&args.split)?,
                ..AfhqOptions::default()
            };
            if let Some(size) = args.img_size {
                opts.img_size = size;
            }
            Reader::Afhq(AfhqReader::new(&args.base_dir, opts))
        }
    };

    let record = reader.read()?;
    write_record_npz(&args.out, &record)?;
    println!(
        "extracted {} samples from '{}' to {}",
        record.len(),
        args.dataset,
        args.out.display()
    );
    Ok(())
}

fn parse_split(raw: &str) -> Result<Split, UnisetError> {
    raw.parse().map_err(UnisetError::InvalidOption)
}

fn pair(raw: &Option<Vec<u32>>) -> Result<Option<(u32, u32)>, UnisetError> {
    match raw {
        None => Ok(None),
        Some(values) if values.len() == 2 => Ok(Some((values[0], values[1]))),
        Some(values) => Err(UnisetError::InvalidOption(format!(
            "expected WIDTH HEIGHT, got {} value(s)",
            values.len()
        ))),
    }
}

/// Writes a record to an `.npz` archive, one named array per sequence.
///
/// Persistence is the downstream pipeline's concern; this is a CLI
/// convenience over the in-memory record, not part of the reader contract.
pub fn write_record_npz(path: &std::path::Path, record: &Record) -> Result<(), UnisetError> {
    let npz_err = |source| UnisetError::NpzWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path)?;
    let mut npz = NpzWriter::new(file);
    npz.add_array("img.npy", &record.imgs).map_err(npz_err)?;
    npz.add_array("class.npy", &record.classes)
        .map_err(npz_err)?;
    match &record.content {
        Some(Content::Codes(codes)) => npz.add_array("content.npy", codes).map_err(npz_err)?,
        Some(Content::Vectors(vectors)) => {
            npz.add_array("content.npy", vectors).map_err(npz_err)?
        }
        None => {}
    }
    if let Some(attributes) = &record.attributes {
        npz.add_array("attributes.npy", attributes)
            .map_err(npz_err)?;
    }
    if let Some(landmarks) = &record.landmarks {
        npz.add_array("landmarks.npy", landmarks).map_err(npz_err)?;
    }
    npz.finish().map_err(npz_err)?;
    Ok(())
}
