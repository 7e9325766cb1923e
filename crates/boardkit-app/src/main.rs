//! boardkit command line entry point.

use boardkit_app::{AppResult, Scenario, replay};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boardkit", version, about = "Replay a board scenario and write the result as SVG")]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Indent the SVG output
    #[arg(long)]
    pretty: bool,
}

fn run(args: Args) -> AppResult<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let replay = replay(scenario)?;
    let svg = replay.to_svg(args.pretty);
    match args.output {
        Some(path) => {
            std::fs::write(&path, svg)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
