extern crate pvsize;

use anyhow::Context;
use clap::Parser;
use pvsize::core::irradiance::PeakSunHoursTable;
use pvsize::core::load::DiversityFactor;
use pvsize::core::panels::PanelCatalog;
use pvsize::input::ingest_sizing_input;
use pvsize::{OperatorSettings, SizingEngine};
use std::fs::File;
use std::io::BufReader;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Size a PV system for one project from a sizing input document.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct SizeArgs {
    /// Sizing input JSON document
    input_file: String,
    /// Peak sun hours reference table (CSV: location,peak_sun_hours)
    #[arg(long, short)]
    sun_hours_file: String,
    /// Panel catalog (CSV: brand,wattage_w,unit_area_m2)
    #[arg(long, short)]
    panels_file: String,
    /// Diversity factor override, 0-1 (defaults to disabled)
    #[arg(long)]
    diversity: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = SizeArgs::parse();

    let sun_hours = PeakSunHoursTable::new(BufReader::new(
        File::open(&args.sun_hours_file)
            .with_context(|| format!("opening {}", args.sun_hours_file))?,
    ))?;
    let panels = PanelCatalog::new(BufReader::new(
        File::open(&args.panels_file).with_context(|| format!("opening {}", args.panels_file))?,
    ))?;

    let mut settings = OperatorSettings::default();
    if let Some(diversity) = args.diversity {
        settings.diversity_factor = DiversityFactor::new(diversity)?;
    }

    let input = ingest_sizing_input(BufReader::new(
        File::open(&args.input_file).with_context(|| format!("opening {}", args.input_file))?,
    ))?;

    let engine = SizingEngine::new(sun_hours, panels, settings);
    let result = engine.compute_sizing(&input)?;
    info!(
        project_id = %result.project_id,
        system_size_kw = result.system_size_kw,
        "sizing complete"
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &result)?;
    println!();

    Ok(())
}
