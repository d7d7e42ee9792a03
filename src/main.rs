//! Tabula - command-mode driver for the in-memory sheet.

mod commands;

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tabula_core::{Sheet, Value};
use tabula_engine::engine::Formula;

fn print_usage() {
    eprintln!("Usage: tabula [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Commands to apply (default: stdin)");
    eprintln!("                            `A1 = <text>` sets a cell, `clear A1` clears it");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate one formula and print its value");
    eprintln!("  --texts                   Print cell texts instead of values");
    eprintln!("  -h, --help                Print help");
}

/// Evaluate a single formula against an empty sheet.
fn run_command(formula: &str) -> Result<Value> {
    let expression = formula.trim();
    let expression = expression.strip_prefix('=').unwrap_or(expression);
    let formula = Formula::parse(expression)?;
    Ok(formula.evaluate(|_| Value::empty()))
}

fn run_script(file: Option<PathBuf>, texts: bool) -> Result<()> {
    let input = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    let mut sheet = Sheet::new();
    commands::apply_script(&mut sheet, &input)?;

    let mut out = io::stdout().lock();
    if texts {
        sheet.print_texts(&mut out)?;
    } else {
        sheet.print_values(&mut out)?;
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut command: Option<String> = None;
    let mut texts = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a formula");
                    std::process::exit(1);
                }
                command = Some(args[i].to_string());
            }
            "--texts" => texts = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    if let Some(formula) = command {
        match run_command(&formula) {
            Ok(value) => {
                println!("{}", value);
                if value.is_error() {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run_script(file_path, texts) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
