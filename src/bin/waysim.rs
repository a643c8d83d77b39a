// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! waysim CLI entry point
//!
//! Drives the cache simulator from the terminal: addresses come from
//! command-line arguments, a trace file, or stdin (one address per line,
//! `#` comments and blank lines skipped), and every access is reported per
//! bank, followed by the cumulative statistics table.

use clap::Parser;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use waysim::core::config::SimulatorConfig;
use waysim::core::simulator::Simulator;
use waysim::frontend;

#[derive(Parser)]
#[command(
    name = "waysim",
    version,
    about = "Set-associative LRU cache simulator"
)]
struct Args {
    /// Addresses to simulate (non-negative decimal integers)
    addresses: Vec<String>,

    /// Read addresses from a trace file instead (one per line, '#' comments)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Load the simulator geometry from a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Associativities to simulate in parallel
    #[arg(short, long, value_delimiter = ',', default_values_t = [1, 2, 4, 8])]
    ways: Vec<usize>,

    /// Number of sets per bank, fixed regardless of associativity
    #[arg(short, long, default_value_t = 8)]
    sets: usize,

    /// Total lines per bank; derives each set count as capacity / ways
    #[arg(long, conflicts_with = "sets")]
    capacity: Option<usize>,

    /// Address units per cache word (1 = word-granular addresses)
    #[arg(long, default_value_t = 1)]
    word_size: u64,

    /// Print the per-bank set tables after every access
    #[arg(long)]
    tables: bool,

    /// Only print the final statistics report
    #[arg(short, long)]
    quiet: bool,
}

fn build_config(args: &Args) -> waysim::Result<SimulatorConfig> {
    if let Some(path) = &args.config {
        return SimulatorConfig::from_toml_file(path);
    }
    let config = match args.capacity {
        Some(total_lines) => {
            SimulatorConfig::fixed_capacity(total_lines, &args.ways, args.word_size)?
        }
        None => SimulatorConfig::fixed_sets(&args.ways, args.sets, args.word_size),
    };
    config.validate()?;
    Ok(config)
}

/// Collect address lines from arguments, the trace file, or stdin
fn read_address_lines(args: &Args) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if !args.addresses.is_empty() {
        return Ok(args.addresses.clone());
    }

    let mut text = String::new();
    match &args.trace {
        Some(path) => {
            log::info!("Reading trace from {}", path.display());
            BufReader::new(std::fs::File::open(path)?).read_to_string(&mut text)?;
        }
        None => {
            log::info!("Reading addresses from stdin");
            std::io::stdin().lock().read_to_string(&mut text)?;
        }
    }

    Ok(text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment configuration, then logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let mut sim = Simulator::new(config)?;

    let mut skipped = 0usize;
    for line in read_address_lines(&args)? {
        let address = match frontend::parse_address(&line) {
            Ok(address) => address,
            Err(err) => {
                eprintln!("{err}");
                skipped += 1;
                continue;
            }
        };

        let result = sim.record_access(address);
        if !args.quiet {
            print!("{}", frontend::render_access(&result));
            if args.tables {
                for bank in sim.banks() {
                    print!("{}", frontend::render_bank_table(bank));
                }
            }
        }
    }

    if !args.quiet && sim.accesses() > 0 {
        println!();
    }
    print!("{}", frontend::render_stats_table(&sim));
    if skipped > 0 {
        eprintln!("{skipped} invalid address line(s) skipped");
    }

    Ok(())
}
