use clap::Parser;
use log::info;

use regression_playground::config::SessionConfig;
use regression_playground::host::{build_schedule, run};
use regression_playground::session::LinearSession;

/// Fits a line through clicked points, one gradient step per frame.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    session: SessionConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args { session: config } = Args::parse();
    let mut rng = config.rng();

    let mut schedule = build_schedule(&config, &mut rng)?;
    let mut session = LinearSession::new(&config, &mut rng)?;

    let summary = run(&mut session, &mut schedule, &config)?;

    for path in &summary.rendered {
        info!("frame written to {}", path.display());
    }

    Ok(())
}
