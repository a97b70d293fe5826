//! Liquor Sales CLI
//!
//! A command-line tool for reporting Iowa liquor sales by store, city and county.

use clap::Parser;
use liquor_sales::cli::{
    args::{Cli, Commands},
    commands::{self, bar, map, options, query, range, summary},
};
use liquor_sales::models::config::{load_config, load_config_from};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Flags override the config file
    let config = match cli.config.as_deref() {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let format = cli.format.unwrap_or(config.display.format);
    let dataset_path = cli
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset.path.clone());

    // The dataset is loaded once and shared read-only by the command
    let dataset = commands::load_dataset(&dataset_path, &config.dataset)?;

    match cli.command {
        Commands::Map {
            filters,
            measure,
            min,
            max,
        } => {
            map::execute_map(
                &dataset,
                &filters,
                measure.as_deref(),
                min,
                max,
                &config,
                format,
            )?;
        }

        Commands::Bar {
            filters,
            measure,
            axis,
        } => {
            bar::execute_bar(&dataset, &filters, measure.as_deref(), &axis, &config, format)?;
        }

        Commands::Range { filters, measure } => {
            range::execute_range(&dataset, &filters, measure.as_deref(), &config, format)?;
        }

        Commands::Query {
            filters,
            group_by,
            measure,
        } => {
            query::execute_query(
                &dataset,
                &filters,
                &group_by,
                measure.as_deref(),
                &config,
                format,
            )?;
        }

        Commands::Options { column } => {
            options::execute_options(&dataset, &column, format)?;
        }

        Commands::Summary => {
            summary::execute_summary(&dataset, format)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("liquor_sales=debug")
    } else {
        EnvFilter::new("liquor_sales=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
