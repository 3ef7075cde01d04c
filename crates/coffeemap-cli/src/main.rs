//! coffeemap: command-line front end for coffeemap-core
//!
//! Loads a coffee statistics table and a GeoJSON boundary file, matches the
//! table's country names to boundary regions, and prints the result.
//!
//! Usage examples
//! --------------
//!
//! - Show the key a name normalizes to
//!   $ coffeemap normalize "Bolivia (Plurinational State of)" "Côte d'Ivoire"
//!
//! - Inspect how one view's countries resolve
//!   $ coffeemap match --metric Export --year 2019
//!
//! - Render-ready rows as JSON, from an ad-hoc CSV
//!   $ coffeemap --boundary world.geojson map --csv exports.csv --json
//!
//! - Selectors of a dataset
//!   $ coffeemap years -m Production
//!   $ coffeemap types -m Production
//!
//! - Boundary names that share a normalized key
//!   $ coffeemap regions --collisions
mod args;

use crate::args::{CliArgs, Commands, DatasetArgs, SelectionArgs};
use anyhow::{bail, Context};
use clap::Parser;
use coffeemap_core::text::normalize;
use coffeemap_core::{AtlasConfig, DatasetSource, LongTable, Selection, TypeFilter, Workspace};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose, args.quiet);

    let mut config = match &args.config {
        Some(path) => AtlasConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AtlasConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(boundary) = args.boundary {
        config.boundary_file = boundary;
    }
    if let Some(cutoff) = args.cutoff {
        config.cutoff = cutoff;
    }
    debug!(?config, "effective configuration");
    let ws = Workspace::new(config).context("invalid configuration")?;

    match args.command {
        Commands::Normalize { names } => {
            for name in names {
                println!("{name}\t{}", normalize(&name));
            }
        }

        Commands::Match { dataset, selection } => {
            let source = dataset_source(&dataset);
            let table = load_table(&ws, &source)?;
            let selection = pick_selection(&table, &selection)?;
            let values = table.aggregate(&selection);
            let result = ws
                .resolve(values.iter().map(|v| v.country.as_str()))
                .context("loading boundary regions")?;

            for (raw, found) in result.iter() {
                match found {
                    Some(m) => println!("{raw} -> {} [{}]", m.reference, m.tier),
                    None => println!("{raw} -> (no match)"),
                }
            }
            let counts = result.tier_counts();
            println!(
                "exact: {}, normalized: {}, fuzzy: {}, unmatched: {}",
                counts.exact, counts.normalized, counts.fuzzy, counts.unmatched
            );
        }

        Commands::Map {
            dataset,
            selection,
            json,
        } => {
            let source = dataset_source(&dataset);
            let table = load_table(&ws, &source)?;
            let selection = pick_selection(&table, &selection)?;
            let frame = ws
                .frame(&source, &selection)
                .context("building map view")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{}", frame.title());
                for row in &frame.rows {
                    let marker = if row.region.is_some() { ' ' } else { '?' };
                    println!("{marker} {:<40} {:>14.2}  {}", row.country, row.value, row.plot_location);
                }
                let missing = frame.rows.len() - frame.matched_count();
                if missing > 0 {
                    println!("{missing} of {} countries have no region", frame.rows.len());
                }
            }
        }

        Commands::Years { dataset } => {
            let table = load_table(&ws, &dataset_source(&dataset))?;
            for year in table.years() {
                println!("{year}");
            }
        }

        Commands::Types { dataset } => {
            let table = load_table(&ws, &dataset_source(&dataset))?;
            for coffee_type in table.coffee_types() {
                println!("{coffee_type}");
            }
        }

        Commands::Regions { collisions } => {
            let boundary = ws.boundary().context("loading boundary regions")?;
            if collisions {
                let index = ws.reference_index()?;
                for (key, names) in index.collisions() {
                    println!("{key}: {}", names.join(" | "));
                }
            } else {
                for name in boundary.region_names() {
                    println!("{name}");
                }
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-q` / `-v` pick the level around `warn`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn dataset_source(args: &DatasetArgs) -> DatasetSource {
    match (&args.metric, &args.csv) {
        (_, Some(path)) => DatasetSource::File(path.clone()),
        (Some(metric), None) => DatasetSource::Metric(metric.clone()),
        // clap requires one of the two
        (None, None) => DatasetSource::Metric(String::new()),
    }
}

fn load_table(ws: &Workspace, source: &DatasetSource) -> anyhow::Result<std::sync::Arc<LongTable>> {
    ws.table(source).with_context(|| match source {
        DatasetSource::Metric(metric) => format!("loading {metric} data"),
        DatasetSource::File(path) => format!("loading {}", path.display()),
    })
}

/// Requested year (or the latest one) plus the coffee type filter.
fn pick_selection(table: &LongTable, args: &SelectionArgs) -> anyhow::Result<Selection> {
    let year = match &args.year {
        Some(year) => {
            if !table.years().iter().any(|y| y == year) {
                bail!("no column for year {year}; see `coffeemap years`");
            }
            year.clone()
        }
        None => match table.latest_year() {
            Some(year) => year,
            None => bail!("dataset has no rows"),
        },
    };
    let coffee_type = TypeFilter::parse(&args.coffee_type);
    if !table.offers(&coffee_type) {
        bail!("no rows of coffee type {coffee_type}; see `coffeemap types`");
    }
    Ok(Selection::new(year, coffee_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeemap_core::Table;

    fn table() -> LongTable {
        let csv = "Country,Coffee type,2018,2019\nBrazil,Arabica,1,2\nViet Nam,Robusta,3,4\n";
        Table::from_reader(csv.as_bytes()).unwrap().melt().unwrap()
    }

    fn selection_args(year: Option<&str>, coffee_type: &str) -> SelectionArgs {
        SelectionArgs {
            year: year.map(str::to_owned),
            coffee_type: coffee_type.to_owned(),
        }
    }

    #[test]
    fn selection_defaults_to_latest_year() {
        let selection = pick_selection(&table(), &selection_args(None, "robusta")).unwrap();
        assert_eq!(selection.year_label, "2019");
        assert_eq!(selection.coffee_type, TypeFilter::Only("robusta".into()));
    }

    #[test]
    fn unknown_year_or_type_is_rejected() {
        assert!(pick_selection(&table(), &selection_args(Some("2020"), "All")).is_err());
        let err = pick_selection(&table(), &selection_args(None, "Robsuta")).unwrap_err();
        assert!(err.to_string().contains("Robsuta"));
    }
}
