use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use idx_digits::plot::{plot_image_sample, plot_image_samples, Colormap};
use idx_digits::sample::choose_samples;
use idx_digits::{load_image_and_label_data, Dataset, TrainConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an image/label package pair and log a summary
    Inspect {
        #[arg(long)]
        images: PathBuf,
        #[arg(long)]
        labels: PathBuf,
    },
    /// Write preview PNGs of a package pair
    Preview {
        #[arg(long)]
        images: PathBuf,
        #[arg(long)]
        labels: PathBuf,
        #[arg(long, default_value = "preview/")]
        out: PathBuf,
        /// How many random samples go into random.png
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = Colormap::Gray)]
        colormap: Colormap,
    },
    /// Write the default training configuration as JSON
    InitConfig {
        #[arg(long, default_value = "train_config.json")]
        out: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Inspect { images, labels } => inspect(&images, &labels),
        Commands::Preview { images, labels, out, count, seed, colormap } => {
            preview(&images, &labels, &out, count, seed, colormap)
        }
        Commands::InitConfig { out } => init_config(&out),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn inspect(images: &Path, labels: &Path) -> Result<()> {
    let samples = load_image_and_label_data(images, labels)
        .with_context(|| format!("loading {}", images.display()))?;
    let dataset = Dataset::from_samples(&samples);

    let (height, width) = dataset.image_size;
    info!("Samples:      {}", dataset.len());
    info!("Image size:   {}x{} ({} inputs)", height, width, dataset.input_size());
    info!("Labels:       {:?} ({} outputs)", dataset.unique_labels, dataset.output_size());
    for (label, count) in dataset.label_frequencies() {
        info!("  label {:>3}: {:>6} samples", label, count);
    }

    let mut rng = StdRng::seed_from_u64(TrainConfig::default().seed);
    let rows = dataset.random_row_indices(10, &mut rng);
    let features = dataset.random_feature_indices(10, &mut rng);
    info!("Random rows:     {:?}", rows);
    info!("Random features: {:?}", features);
    for &row in &rows {
        let values: Vec<f32> = features.iter().map(|&f| dataset.x.row(row)[f]).collect();
        info!("  row {:>6} (label {:>3}): {:.3?}", row, dataset.labels[row], values);
    }
    Ok(())
}

fn preview(
    images: &Path,
    labels: &Path,
    out: &Path,
    count: usize,
    seed: u64,
    colormap: Colormap,
) -> Result<()> {
    info!("Loading images from {}", images.display());
    let samples = load_image_and_label_data(images, labels)
        .with_context(|| format!("loading {}", images.display()))?;
    let first = samples.first().context("package pair contains no samples")?;

    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    plot_image_sample(first, colormap, out.join("first.png"))?;
    plot_image_samples(samples.iter().take(3), colormap, out.join("strip.png"))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let random = choose_samples(&samples, count, &mut rng);
    if !random.is_empty() {
        plot_image_samples(random, colormap, out.join("random.png"))?;
    }

    Ok(())
}

fn init_config(out: &Path) -> Result<()> {
    TrainConfig::default()
        .save_json(out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!("Wrote default training config to {}", out.display());
    Ok(())
}
