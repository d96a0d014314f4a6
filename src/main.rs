use std::path::PathBuf;

use _model::Coordinate;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::{
    config::Config,
    directory::VisitChampaign,
    geocoder::MapDevelopers,
    geofence::CampusBoundary,
    ratings::{GoogleSearch, Zomato},
    utils::{agent, read_json},
};

mod chains;
mod config;
mod directory;
mod error;
mod export;
mod form;
mod geocoder;
mod geofence;
mod pipeline;
mod ratings;
mod utils;

const DEFAULT_MAX_COUNT: usize = 1000;

#[derive(Debug, Parser)]
struct Cli {
    /// YAML file overriding the built-in endpoints and parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "ZOMATO_USER_KEY", hide_env_values = true)]
    zomato_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Fetch the directory and geocode every listing
    Scrape {
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = DEFAULT_MAX_COUNT)]
        count: usize,
    },
    /// Retry geocoding for locations without a coordinate
    Regeocode {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Keep eateries with a location on the extended campus
    InBounds {
        #[arg(long)]
        boundary: Option<PathBuf>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Turn the fast food CSV into a name list
    FastFoodNames {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List eateries with several locations for manual review
    ChainCandidates {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Drop eateries named like a known fast food chain
    FilterChains {
        #[arg(long)]
        names: Option<PathBuf>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add price and rating from Zomato
    Enrich {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace rating with Google's rating and review count
    Reviews {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write NAME,LATITUDE,LONGITUDE rows
    ExportCsv {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Scrape, bound, filter, enrich and export in one go
    Run {
        #[arg(long, default_value_t = DEFAULT_MAX_COUNT)]
        count: usize,
        /// Recompute every stage even when its checkpoint exists
        #[arg(long)]
        fresh: bool,
    },
}

fn zomato(config: &Config) -> Result<Zomato> {
    let key = config
        .zomato
        .user_key
        .clone()
        .context("Zomato user key missing, set ZOMATO_USER_KEY or pass --zomato-key")?;
    Ok(Zomato::new(
        agent(config),
        &config.zomato.url,
        key,
        config.zomato.radius,
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.zomato_key.is_some() {
        config.zomato.user_key = cli.zomato_key;
    }

    let paths = config.paths();
    let near = Coordinate::new(config.zomato.latitude, config.zomato.longitude);
    let directory = || VisitChampaign::new(agent(&config), config.directory.clone());
    let geocoder = || MapDevelopers::new(agent(&config), &config.geocoder.url);

    match cli.command {
        Command::Scrape { start, count } => {
            pipeline::scrape(&directory(), &geocoder(), start, count, &paths)?;
        }
        Command::Regeocode { input, output } => {
            let input = input.unwrap_or_else(|| paths.eateries());
            let output = output.unwrap_or_else(|| input.clone());
            pipeline::regeocode(&geocoder(), &input, &output)?;
        }
        Command::InBounds {
            boundary,
            input,
            output,
        } => {
            let boundary =
                CampusBoundary::load(&boundary.unwrap_or_else(|| paths.boundary()))?;
            pipeline::in_bounds(
                &boundary,
                &input.unwrap_or_else(|| paths.eateries()),
                &output.unwrap_or_else(|| paths.in_bounds()),
            )?;
        }
        Command::FastFoodNames { input, output } => {
            pipeline::fast_food_names(
                &input.unwrap_or_else(|| paths.fast_food_csv()),
                &output.unwrap_or_else(|| paths.fast_food_names()),
            )?;
        }
        Command::ChainCandidates { input, output } => {
            pipeline::chain_candidates(
                &input.unwrap_or_else(|| paths.eateries()),
                &output.unwrap_or_else(|| paths.chain_candidates()),
            )?;
        }
        Command::FilterChains {
            names,
            input,
            output,
        } => {
            let names = read_json(&names.unwrap_or_else(|| paths.fast_food_names()))?;
            pipeline::filter_chains(
                &names,
                &input.unwrap_or_else(|| paths.in_bounds()),
                &output.unwrap_or_else(|| paths.filtered()),
            )?;
        }
        Command::Enrich { input, output } => {
            pipeline::enrich(
                &zomato(&config)?,
                near,
                &input.unwrap_or_else(|| paths.filtered()),
                &output.unwrap_or_else(|| paths.dataset()),
            )?;
        }
        Command::Reviews { input, output } => {
            let google = GoogleSearch::new(
                agent(&config),
                &config.google.url,
                &config.google.user_agent,
            );
            let input = input.unwrap_or_else(|| paths.dataset());
            let output = output.unwrap_or_else(|| input.clone());
            pipeline::reviews(&google, &input, &output)?;
        }
        Command::ExportCsv { input, output } => {
            pipeline::export_csv(
                &input.unwrap_or_else(|| paths.dataset()),
                &output.unwrap_or_else(|| paths.dataset_csv()),
            )?;
        }
        Command::Run { count, fresh } => {
            let dataset = pipeline::run(
                &directory(),
                &geocoder(),
                &zomato(&config)?,
                near,
                count,
                &paths,
                fresh,
            )?;
            log::info!("Dataset has {} eateries", dataset.len());
        }
    }

    Ok(())
}
