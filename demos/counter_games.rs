//! Counter games and robot navigation: the MtSyft comparison tables
//!
//! With a config file, runs that single comparison:
//!
//!   cargo run --example counter_games -- table1.json [out_dir]
//!
//! Without arguments, runs the four preset comparisons over the default
//! solver logs (`res_mtsyft.csv`, `res_cb_mtsyft.csv`, `res_conj_mtsyft.csv`)
//! in the current directory.
//!
//! Set `RUST_LOG=mtsyft_results=debug` to see per-variant resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use mtsyft_results::config::ComparisonConfig;
use mtsyft_results::family::{presets, BenchmarkFamily};
use mtsyft_results::storage::ResultStorage;
use mtsyft_results::table::ComparisonTable;
use mtsyft_results::Comparison;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(config_path) => {
            let config = ComparisonConfig::from_path(&config_path)
                .with_context(|| format!("reading comparison config {config_path}"))?;
            let comparison = Comparison::from_config(config)?;
            report(&comparison);
            if let Some(out_dir) = args.next() {
                export(&comparison, Path::new(&out_dir))?;
            }
        }
        None => run_presets()?,
    }
    Ok(())
}

fn run_presets() -> Result<()> {
    let log = |variant: &str| -> PathBuf {
        presets::DEFAULT_LOGS
            .iter()
            .find(|(id, _)| *id == variant)
            .map_or_else(|| PathBuf::from(variant), |(_, file)| PathBuf::from(file))
    };

    let figures: [(BenchmarkFamily, &[&str], Option<&str>); 4] = [
        (
            presets::counter_tiers(8).with_name("figure-1"),
            &[presets::MTSYFT, presets::CB_MTSYFT],
            None,
        ),
        (
            presets::counter_tiers(1).with_name("figure-2"),
            &[presets::MTSYFT, presets::CONJ_MTSYFT],
            None,
        ),
        (
            presets::counter_coverage().with_name("table-1"),
            &[presets::MTSYFT, presets::CB_MTSYFT, presets::CONJ_MTSYFT],
            Some("k"),
        ),
        (
            presets::robot_navigation().with_name("table-2"),
            &[presets::MTSYFT, presets::CB_MTSYFT, presets::CONJ_MTSYFT],
            Some("rooms"),
        ),
    ];

    for (family, variants, group_by) in figures {
        let name = family.name().to_string();
        let mut builder = Comparison::builder(family);
        for variant in variants {
            builder = builder.variant(*variant, log(*variant));
        }
        if let Some(param) = group_by {
            builder = builder.group_by(param);
        }

        let comparison = builder
            .run()
            .with_context(|| format!("building {name}"))?;
        report(&comparison);
    }
    Ok(())
}

fn report(comparison: &Comparison) {
    let table = comparison.table();
    println!("=== {} ({} instances) ===", table.name(), table.len());
    print_table(table);

    if !comparison.rejected().is_empty() {
        println!("\n{} log rows were excluded:", comparison.rejected().len());
        for malformed in comparison.rejected() {
            println!("  {malformed}");
        }
    }

    if let Ok(coverage) = comparison.coverage() {
        println!("\n{:>8} {:<14} {:>10} {:>12}", "group", "variant", "solved", "avg time");
        for (group, variant, stat) in coverage.iter() {
            println!(
                "{group:>8} {variant:<14} {:>6}/{:<3} {:>12.2}",
                stat.solved, stat.instances, stat.avg_runtime
            );
        }
    }
    println!();
}

fn print_table(table: &ComparisonTable) {
    print!("{:<24}", "instance");
    for variant in table.variants() {
        print!(" {variant:>14}");
    }
    println!();

    for row in table {
        print!("{:<24}", row.key().to_string());
        for (_, time) in row.times() {
            print!(" {:>14}", time.to_string());
        }
        println!();
    }
}

fn export(comparison: &Comparison, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let table = comparison.table();

    let table_path = out_dir.join(format!("{}.parquet", table.name()));
    ResultStorage::from_batch(table.to_record_batch()?).write_parquet(&table_path)?;
    println!("wrote {}", table_path.display());

    if let Ok(coverage) = comparison.coverage() {
        let coverage_path = out_dir.join(format!("{}-coverage.parquet", table.name()));
        ResultStorage::from_batch(coverage.to_record_batch()?).write_parquet(&coverage_path)?;
        println!("wrote {}", coverage_path.display());
    }
    Ok(())
}
