//! Generator configuration with environment overrides
//!
//! Environment variables are parsed leniently: a missing or unparsable value
//! falls back to the default. Command-line flags override both.

use std::path::PathBuf;
use std::str::FromStr;

use crate::models::ECLevel;
use crate::render::RenderOptions;

fn parse_value<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse::<T>().ok()
}

/// `0` is off, any other small integer is on
fn parse_flag(raw: &str) -> Option<bool> {
    parse_value::<u8>(raw).map(|v| v != 0)
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| parse_value(&v))
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    parse_env(name).unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

/// Pixels per module
pub const ENV_BOX_SIZE: &str = "LAYERED_QR_BOX_SIZE";
/// Quiet zone width in modules
pub const ENV_BORDER: &str = "LAYERED_QR_BORDER";
/// Error correction level (L, M, Q, H)
pub const ENV_EC_LEVEL: &str = "LAYERED_QR_EC_LEVEL";
/// Fixed rng seed
pub const ENV_SEED: &str = "LAYERED_QR_SEED";
/// Row-parallel distribution (0/1)
pub const ENV_PARALLEL: &str = "LAYERED_QR_PARALLEL";

/// Everything the pipeline needs besides the data and `(k, n)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Error correction level for the encoded symbol
    pub ec_level: ECLevel,
    /// Pixel scaling and margin of the written images
    pub render: RenderOptions,
    /// Directory the layer files go into
    pub output_dir: PathBuf,
    /// File name prefix of each layer
    pub prefix: String,
    /// Fixed seed for reproducible output; entropy when `None`
    pub seed: Option<u64>,
    /// Distribute rows on the rayon pool
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::L,
            render: RenderOptions::default(),
            output_dir: PathBuf::from("output_layers"),
            prefix: "qr".to_string(),
            seed: None,
            parallel: false,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overridden by any `LAYERED_QR_*` variables that are set
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ec_level: parse_env(ENV_EC_LEVEL).unwrap_or(defaults.ec_level),
            render: RenderOptions {
                module_pixels: parse_env_u32(ENV_BOX_SIZE, defaults.render.module_pixels),
                quiet_zone: parse_env_u32(ENV_BORDER, defaults.render.quiet_zone),
            },
            seed: parse_env(ENV_SEED).or(defaults.seed),
            parallel: parse_env_bool_u8(ENV_PARALLEL, defaults.parallel),
            ..defaults
        }
    }
}
