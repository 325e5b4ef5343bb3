//! Bloch–Siegert shift of the fringe minimum as a function of the initial RF
//! phase (Ramsey) or the pulse width (Rabi).
//!
//! Writes each narrow fringe as `rf<k>` and the minima as `shift`.

use clap::Parser;
use tracing::info;
use ramsey_scan::{ cli, config::Config, Scanner };

fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = cli::Args::parse();
    let config = args.load_config(Config::shift_phase_default)?;
    cli::init_threads(config.threads)?;
    let scan = config.require_shift()?;
    let mut sink = args.sink()?;

    let scanner = Scanner::from_config(&config);
    let summary = scanner.shift_scan(&scan, sink.as_mut())?;
    let shifts = summary.shifts(config.physics.w0);
    let (lo, hi)
        = shifts.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(*s), hi.max(*s)));
    info!(fringes = summary.len(), min_shift = lo, max_shift = hi, "shift scan done");
    sink.write_summary("shift", &scanner.header(scan.outer.var), &summary)?;
    info!(outdir = %args.outdir.display(), "done");
    Ok(())
}
