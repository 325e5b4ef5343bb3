//! A single fringe: the final Z probability over one swept variable.
//!
//! By default, a circular Ramsey frequency fringe from 180 to 186 rad/s.

use clap::Parser;
use tracing::info;
use ramsey_scan::{ cli, config::Config, minimum::grid_min, Scanner };

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = cli::Args::parse();
    let config = args.load_config(Config::ramsey_default)?;
    cli::init_threads(config.threads)?;
    let sweep = config.require_sweep()?;
    let mut sink = args.sink()?;

    let scanner = Scanner::from_config(&config);
    info!(
        var = %sweep.var,
        start = sweep.range.start,
        stop = sweep.range.stop,
        step = sweep.range.step,
        field = %config.physics.field,
        "scanning"
    );
    let fringe = scanner.fringe(&sweep)?;
    if let Some((x, z)) = grid_min(&fringe.x, &fringe.z_prob) {
        info!(x, z, "lowest point");
    }
    let name = config.fringe_name(sweep.var);
    sink.write_fringe(&name, &scanner.header(sweep.var), &fringe)?;
    info!(outdir = %args.outdir.display(), points = fringe.len(), "done");
    Ok(())
}
