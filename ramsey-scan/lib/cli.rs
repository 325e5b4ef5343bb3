//! Command-line arguments and process setup shared by the binaries.

use std::path::PathBuf;
use clap::{ Parser, ValueEnum };
use tracing_subscriber::EnvFilter;
use crate::{
    config::Config,
    error::{ Error, Result },
    sink::{ NpzSink, Sink, TextSink },
};

/// Output file format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Comma-separated text with `#` header lines.
    Text,
    /// NumPy `.npz` archives.
    Npz,
}

#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// TOML run configuration; the built-in reference run if omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to write tables into.
    #[arg(short, long, default_value = "output")]
    pub outdir: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl Args {
    /// Load the configuration file, or fall back to `default`.
    pub fn load_config<F>(&self, default: F) -> Result<Config>
    where F: FnOnce() -> Config
    {
        match &self.config {
            Some(path) => Config::load(path),
            None => Ok(default()),
        }
    }

    /// Open a sink of the requested format on the output directory.
    pub fn sink(&self) -> Result<Box<dyn Sink>> {
        Ok(match self.format {
            Format::Text => Box::new(TextSink::new(&self.outdir)?),
            Format::Npz => Box::new(NpzSink::new(&self.outdir)?),
        })
    }
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
pub fn init_logging() {
    let filter
        = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Size the global rayon pool; 0 keeps rayon's default.
pub fn init_threads(threads: usize) -> Result<()> {
    if threads == 0 { return Ok(()); }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| Error::scan(format!("cannot start thread pool: {}", e)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_arguments() {
        let args = Args::parse_from(["fringe"]);
        assert_eq!(args.config, None);
        assert_eq!(args.outdir, PathBuf::from("output"));
        assert_eq!(args.format, Format::Text);

        let args = Args::parse_from(
            ["shift", "--config", "shift.toml", "-o", "out", "--format", "npz"]);
        assert_eq!(args.config, Some(PathBuf::from("shift.toml")));
        assert_eq!(args.outdir, PathBuf::from("out"));
        assert_eq!(args.format, Format::Npz);
        assert!(Args::try_parse_from(["shift", "--format", "csv"]).is_err());
    }

    #[test]
    fn default_config_when_none_given() {
        let args = Args::parse_from(["rabi"]);
        let config = args.load_config(Config::rabi_default).unwrap();
        assert_eq!(config, Config::rabi_default());
    }
}
