//! Entry point for the band_stats application.
//! Handles CLI parsing and logging setup, then dispatches to image counting,
//! single-image description or the statistics batch.

use band_stats::batch::run_batch;
use band_stats::cli::Args;
use band_stats::discovery::count_images;
use band_stats::metadata::describe_image;
use band_stats::parallel::{get_parallel_info, ParallelConfig};
use clap::Parser;
use env_logger::{Builder, Env};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format_timestamp_secs();
    builder.init();

    let banner = r#"
------------------------------------------------------------------
                          band_stats
          per-band statistics for multi-band rasters
------------------------------------------------------------------
"#;
    // With `--json -` stdout carries only the JSON document
    let json_to_stdout = args.json_to_stdout();
    if json_to_stdout {
        eprintln!("{}", banner);
    } else {
        println!("{}", banner);
    }

    ParallelConfig::new(args.threads).setup_global_pool()?;
    get_parallel_info().log_info();

    if let Some(path) = &args.describe {
        describe_image(path)?;
        return Ok(());
    }

    let Some(config) = args.to_config() else {
        return Err("an input directory is required".into());
    };

    if args.count_only {
        let n = count_images(&config.input_dir, &config.pattern)?;
        println!("Number of images: {}", n);
        return Ok(());
    }

    log::info!(
        "Input: {} ({}), bands: {}, validity: {}, mode: {}, on band mismatch: {}",
        config.input_dir.display(),
        config.pattern,
        config
            .gate
            .expected_bands
            .map_or_else(|| "any".to_string(), |n| n.to_string()),
        config.gate.validity.as_str(),
        config.gate.mode.as_str(),
        config.gate.band_count_policy.as_str()
    );

    let report = run_batch(&config)?;
    if json_to_stdout {
        report.write_summary(&mut std::io::stderr())?;
    } else {
        report.print_summary();
    }

    if let Some(json_path) = &args.json {
        report.write_json(json_path)?;
    }

    Ok(())
}
