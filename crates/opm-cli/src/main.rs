use std::path::PathBuf;

use clap::Parser;

use opm_io as io;
use opm_unshear::{BackendKind, Unshearer};

#[derive(Parser)]
#[command(name = "opm-unshear", about = "Remove scan shear from a volume file")]
struct Args {
    /// Input volume file.
    input: PathBuf,

    /// Output volume file.
    output: PathBuf,

    /// Shear slope in pixels per plane; sign follows the scan polarity.
    #[arg(long)]
    slope: f32,

    /// Scan axis: the plane index along this axis scales the shift.
    #[arg(long, default_value_t = 0)]
    scan_axis: usize,

    /// Shift axis: each plane is translated along this axis.
    #[arg(long, default_value_t = 1)]
    shift_axis: usize,

    /// Backend to run on; `auto` probes for an accelerator and falls back
    /// to the host.
    #[arg(long, default_value = "auto")]
    backend: Backend,
}

#[derive(Clone, clap::ValueEnum)]
enum Backend {
    Auto,
    Host,
    Accelerator,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let engine = match args.backend {
        Backend::Auto => Unshearer::auto(),
        Backend::Host => Unshearer::new(BackendKind::Host)?,
        Backend::Accelerator => Unshearer::new(BackendKind::Accelerator)?,
    };

    let volume = io::read_volume(&args.input)?;
    log::info!(
        "Loaded {:?} volume from {} ({} backend)",
        volume.shape,
        args.input.display(),
        engine.kind()
    );

    let corrected = engine.unshear(&volume, args.shift_axis, args.scan_axis, args.slope)?;

    io::write_volume(&args.output, &corrected)?;
    log::info!(
        "Wrote {:?} volume to {}",
        corrected.shape,
        args.output.display()
    );

    Ok(())
}
