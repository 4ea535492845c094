use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use layered_qr::{ECLevel, GeneratorConfig, LayerGenerator, ThresholdParams};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "layered-qr",
    version,
    about = "Split a QR code into n transparent layers; any k of them stacked show the code"
)]
struct Cli {
    /// Text to encode in the final QR code
    data: String,

    /// Total number of layers to generate (n)
    #[arg(short = 'n', long = "total-layers")]
    total: usize,

    /// Number of layers that must be stacked to show the code (k)
    #[arg(short = 'k', long = "required-layers")]
    required: usize,

    /// Directory the layer PNGs are written to
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// File name prefix: <prefix>_layer_<i>_of_<n>.png
    #[arg(long)]
    prefix: Option<String>,

    /// Pixels per QR module
    #[arg(long)]
    box_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long)]
    border: Option<u32>,

    /// Error correction level (L, M, Q, H)
    #[arg(long)]
    ec_level: Option<ECLevel>,

    /// Seed for reproducible layers
    #[arg(long)]
    seed: Option<u64>,

    /// Distribute rows in parallel
    #[arg(long)]
    parallel: bool,
}

/// One invocation: what to encode, `(k, n)` and the resolved configuration
#[derive(Debug)]
struct Job {
    data: String,
    required: usize,
    total: usize,
    config: GeneratorConfig,
}

impl Cli {
    /// Layer the flags that were given over `config`
    fn apply(self, mut config: GeneratorConfig) -> Job {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(px) = self.box_size {
            config.render.module_pixels = px;
        }
        if let Some(border) = self.border {
            config.render.quiet_zone = border;
        }
        if let Some(ec) = self.ec_level {
            config.ec_level = ec;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.parallel |= self.parallel;
        Job {
            data: self.data,
            required: self.required,
            total: self.total,
            config,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Job {
        data,
        required: k,
        total: n,
        config,
    } = Cli::parse().apply(GeneratorConfig::from_env());
    let params = ThresholdParams::new(k, n).context("invalid layer counts")?;

    let generator = LayerGenerator::new(config);
    let generated = generator
        .generate(data.as_bytes(), params)
        .with_context(|| format!("failed to split {} bytes into {n} layers", data.len()))?;
    let paths = generator.write(&generated).with_context(|| {
        format!(
            "failed to write layers to {}",
            generator.config().output_dir.display()
        )
    })?;

    println!(
        "Wrote {} layers (any {} reconstruct the version {} code):",
        paths.len(),
        k,
        generated.matrix.version()
    );
    for path in &paths {
        println!("  {}", path.display());
    }
    Ok(())
}
