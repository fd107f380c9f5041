use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use wish2share_config::{get_config, get_config_from, Config, StrategyKind};
use wish2share_draw::store::{load_event, update_event};
use wish2share_draw::{AssignmentGenerator, Event, EventError};
use wish2share_telemetry::setup_logging;

#[derive(Parser, Debug)]
#[command(name = "wish2share-draw")]
#[command(about = "Draw names for a gift exchange while honoring exclusion rules")]
#[command(version)]
struct Args {
    /// Configuration file, defaults to ./wish2share.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate participants and exclusion rules without drawing
    Check { event: PathBuf },
    /// Draw names and store them in the event file
    Draw {
        event: PathBuf,
        /// Seed for a reproducible draw, overrides the configuration
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Print the result instead of storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Forget a stored draw so names can be drawn again
    Reset { event: PathBuf },
    /// Print the stored draw
    Show {
        event: PathBuf,
        /// Only print whom this participant buys for
        #[arg(long, value_name = "ID")]
        giver: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    RejectionSampling,
    Matching,
}

impl From<StrategyArg> for StrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::RejectionSampling => Self::RejectionSampling,
            StrategyArg::Matching => Self::Matching,
        }
    }
}

fn print_assignment(event: &Event) {
    let Some(assignment) = event.assignment() else {
        println!("names for {} have not been drawn yet", event.name);
        return;
    };
    for (giver, recipient) in assignment.iter() {
        let name = |id: &str| {
            event
                .participant(id)
                .map_or_else(|| id.to_owned(), wish2share_draw::Participant::full_name)
        };
        println!("{} -> {}", name(giver.as_str()), name(recipient.as_str()));
    }
}

/// Draws unless the event was drawn already or its rules break the configured margin.
fn draw_event(
    event: &mut Event,
    required: usize,
    generator: &AssignmentGenerator,
    rng: &mut StdRng,
) -> Result<(), EventError> {
    if event.is_drawn() {
        return Err(EventError::AlreadyDrawn);
    }
    event.check(required)?;
    event.draw(generator, rng)?;
    Ok(())
}

fn run(args: Args, config: &Config) -> Result<(), Box<dyn Error>> {
    match args.command {
        Command::Check { event: path } => {
            let event = load_event(&path)?;
            event.check(config.min_remaining_candidates)?;
            println!(
                "{} participants, exclusion rules are fine",
                event.participants().len()
            );
        }
        Command::Draw {
            event: path,
            seed,
            strategy,
            dry_run,
        } => {
            let mut config = config.clone();
            if let Some(strategy) = strategy {
                config.strategy = strategy.into();
            }
            let generator = AssignmentGenerator::from_config(&config);
            let mut rng = match seed.or(config.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let required = config.min_remaining_candidates;
            if dry_run {
                let mut event = load_event(&path)?;
                draw_event(&mut event, required, &generator, &mut rng)?;
                print_assignment(&event);
            } else {
                let participants = update_event(&path, |event| {
                    draw_event(event, required, &generator, &mut rng)?;
                    Ok::<_, Box<dyn Error>>(event.participants().len())
                })?;
                println!("names drawn for {participants} participants");
            }
        }
        Command::Reset { event: path } => {
            let reset = update_event(&path, |event| {
                Ok::<_, Box<dyn Error>>(event.reset_draw().is_some())
            })?;
            if reset {
                println!("draw reset");
            } else {
                println!("nothing to reset");
            }
        }
        Command::Show { event: path, giver } => {
            let event = load_event(&path)?;
            match giver {
                Some(giver) => match event.recipient_for(&giver)? {
                    Some(recipient) => println!("{}", recipient.full_name()),
                    None => println!("names for {} have not been drawn yet", event.name),
                },
                None => print_assignment(&event),
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    Ok(match path {
        Some(path) => get_config_from(path)?,
        None => get_config()?,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(strategy = ?config.strategy, "configuration loaded");

    match run(args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
