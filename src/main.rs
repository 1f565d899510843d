//! Rockfall Risk Dashboard - Main Service
//!
//! A small server that:
//! 1. Loads and validates the per-zone sensitivity table (zones.toml)
//! 2. Serves the single-page dashboard (sliders, map, legend, alert cards)
//! 3. Evaluates the risk engine through the stale/fresh update policy
//!
//! The engine itself is pure arithmetic over the slider inputs; the service
//! ingests nothing and persists nothing across restarts.
//!
//! Usage:
//!   cargo run --release                  # Serve the dashboard on port 8080
//!   cargo run --release -- --port 9000   # Serve on a different port

use rockmon_service::config::{self, SensitivityTable};
use rockmon_service::endpoint;
use rockmon_service::zones::ZONE_REGISTRY;
use std::env;

const DEFAULT_PORT: u16 = 8080;

fn main() {
    println!("🪨 Rockfall Risk Dashboard");
    println!("==========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port = DEFAULT_PORT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(p) => port = p,
                        Err(_) => {
                            eprintln!("Error: --port requires a valid port number");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load and validate the sensitivity table
    println!("📊 Loading sensitivity table from {}...", config::DEFAULT_CONFIG_PATH);
    let sensitivities = match SensitivityTable::load(config::DEFAULT_CONFIG_PATH) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Sensitivity table validated against {} zones\n", ZONE_REGISTRY.len());

    for zone in ZONE_REGISTRY {
        println!("   {} ({:.2}, {:.2})", zone.name, zone.latitude, zone.longitude);
    }
    println!();

    // Serve the dashboard (foreground; one request at a time)
    println!("🚀 Starting dashboard server...");
    if let Err(e) = endpoint::start_dashboard_server(port, sensitivities) {
        eprintln!("\n❌ Server error: {}", e);
        std::process::exit(1);
    }
}
