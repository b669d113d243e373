//! Hazard Observation Collection Service - Main Daemon
//!
//! A server-side daemon that continuously:
//! 1. Harvests observations from USGS, NOAA, and NASA sources
//! 2. Deduplicates and warehouses them (PostgreSQL or in-memory)
//! 3. Classifies severity and fans qualifying events out to alert channels
//! 4. Provides an HTTP endpoint for triggering collection manually
//!
//! Usage:
//!   cargo run --release                    # Start daemon without HTTP endpoint
//!   cargo run --release -- --endpoint 8080 # Start with HTTP endpoint on port 8080
//!   cargo run --release -- --memory-store  # Run without PostgreSQL
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string
//!   NASA_API_KEY - DONKI API key (DEMO_KEY used otherwise)

use hazmon_service::collector::{Collector, CollectorHandle};
use hazmon_service::config::CollectorConfig;
use hazmon_service::daemon::Daemon;
use hazmon_service::db::{self, PgStore};
use hazmon_service::endpoint;
use hazmon_service::publish::PubsubPublisher;
use hazmon_service::store::{MemoryStore, ObservationStore};
use hazmon_service::stations;
use std::env;
use std::sync::Arc;

fn main() {
    println!("🌊 Hazard Observation Collection Service");
    println!("=========================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut memory_store = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                if i + 1 < args.len() {
                    endpoint_port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--memory-store" => {
                memory_store = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--endpoint PORT] [--memory-store]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load configuration once; components receive it by reference.
    println!("📊 Loading configuration...");
    let config = match CollectorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Configuration loaded\n");

    // Connect the store: PostgreSQL by default, in-memory on request.
    let store: Arc<dyn ObservationStore> = if memory_store {
        println!("📦 Using in-memory store (no persistence across restarts)\n");
        Arc::new(MemoryStore::new())
    } else {
        println!("📦 Connecting to PostgreSQL...");
        match db::connect_and_prepare() {
            Ok(client) => {
                println!("✓ Database ready\n");
                Arc::new(PgStore::new(client))
            }
            Err(e) => {
                eprintln!("\n❌ Database setup failed: {}\n", e);
                eprintln!("Run with --memory-store to start without PostgreSQL\n");
                std::process::exit(1);
            }
        }
    };

    let publisher = Arc::new(PubsubPublisher::new(config.publish.clone()));
    let schedule = config.schedule.clone();
    let collector = Arc::new(Collector::new(config, store, publisher));
    let daemon = Daemon::new(Arc::clone(&collector), schedule);

    // Initialize: validate rosters
    println!("📋 Initializing daemon...");
    if let Err(e) = daemon.initialize() {
        eprintln!("\n❌ Initialization failed: {}\n", e);
        std::process::exit(1);
    }
    println!("✓ Daemon initialized\n");

    // Report data freshness so operators see pending first collections.
    println!("📋 Checking data freshness...");
    daemon.report_freshness();
    println!();

    // Start HTTP endpoint if requested (in background thread)
    if let Some(port) = endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        let handle = CollectorHandle::new(Arc::clone(&collector));
        std::thread::spawn(move || {
            if let Err(e) = endpoint::start_endpoint_server(port, handle) {
                eprintln!("❌ Endpoint server error: {}", e);
            }
        });
        println!("   Endpoint running on http://0.0.0.0:{}\n", port);
    }

    // Run the periodic triggers
    println!("🔄 Starting continuous collection...");
    println!(
        "   Monitoring {} tide stations + {} river sites + seismic + space weather",
        stations::TIDE_STATIONS.len(),
        stations::RIVER_SITES.len()
    );
    println!("   Press Ctrl+C to stop\n");

    daemon.run();
}
