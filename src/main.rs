//! Chitra CLI - batch image effects processor.

use anyhow::{bail, Context, Result};
use chitra::prelude::*;
use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "list" => list_filters(),
        "run" => {
            if let Err(error) = run_batch(&args[2..]) {
                eprintln!("Error: {:#}", error);
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => print_usage(&args[0]),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    println!("chitra v{} - batch image effects", chitra::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                      List all available filters");
    println!("  run <input> <output>      Apply every filter to every image in <input>");
    println!("  help                      Show this help message");
    println!();
    println!("Run options:");
    println!("  --clean                   Delete existing outputs first, recompute everything");
    println!("  --filters <a,b,c>         Only apply the named filters");
    println!("  --json                    Print the run summary as JSON");
}

fn list_filters() {
    let registry = FilterRegistry::with_builtins();
    let grouped = registry.grouped_by_category();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in grouped {
        println!("  {}", category.display_name());
        for metadata in filters {
            println!("      • {} - {}", metadata.id, metadata.description);
        }
        println!();
    }

    println!("Output naming: photo.jpg processed by 'sepia' becomes photo_sepia.jpg");
}

fn run_batch(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!("usage: run <input_dir> <output_dir> [--clean] [--filters a,b,c] [--json]");
    }

    let input_dir = Path::new(&args[0]);
    let output_dir = Path::new(&args[1]);

    let mut options = BatchOptions::default();
    let mut json_output = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--clean" => {
                options.clean = true;
                i += 1;
            }
            "--filters" if i + 1 < args.len() => {
                options.filters = Some(
                    args[i + 1]
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                );
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => bail!("unknown option: {}", other),
        }
    }

    let registry = FilterRegistry::with_builtins();
    let runner = BatchRunner::new(registry).with_options(options);

    let summary = runner
        .run(input_dir, output_dir)
        .context("batch could not start")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "✓ Batch complete: {} image(s), {} written, {} skipped",
        summary.images_seen, summary.outputs_written, summary.outputs_skipped
    );

    if summary.unreadable_inputs > 0 {
        println!("⚠ {} input(s) could not be read", summary.unreadable_inputs);
    }
    for failure in &summary.failures {
        println!(
            "⚠ {} / {}: {}",
            failure.image, failure.filter, failure.message
        );
    }

    // Per-file failures are reported, not fatal; only directory setup
    // errors reach the caller as Err
    Ok(())
}
