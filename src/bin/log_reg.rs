use clap::Parser;
use log::info;

use regression_playground::config::{ClassifierConfig, SessionConfig};
use regression_playground::host::{build_schedule, run};
use regression_playground::session::LogisticSession;

/// Separates blue from red points with logistic regression; clicked points are
/// colored by the current model and then join the training set.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    session: SessionConfig,

    #[command(flatten)]
    classifier: ClassifierConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args {
        session: config,
        classifier,
    } = Args::parse();
    let mut rng = config.rng();

    let mut schedule = build_schedule(&config, &mut rng)?;
    let mut session = LogisticSession::new(&config, &classifier, &mut rng)?;

    info!(
        "starting with {} seed points per class, commit latency {}",
        classifier.initial_per_class, classifier.commit_latency
    );

    let summary = run(&mut session, &mut schedule, &config)?;

    for path in &summary.rendered {
        info!("frame written to {}", path.display());
    }

    Ok(())
}
