//! `lumo-cli` – the `lumo` demo binary.
//!
//! Runs the scripted demonstration sequence (object search, drive
//! pattern, head nod, greeting) against a simulated robot. The real
//! device is driven by the vendor runner; this binary exists so the
//! whole stack can be exercised end to end without hardware:
//!
//! 1. Loads (or creates, on first run) `~/.lumo/config.toml`.
//! 2. Initialises `tracing` (RUST_LOG / LUMO_LOG_FORMAT=json).
//! 3. Installs a Ctrl-C handler that aborts the run.
//! 4. Wires a scripted [`SimRobot`] world and runs
//!    [`run_demo`][lumo_runtime::run_demo].

mod config;

use std::process::ExitCode;
use std::time::Duration;

use colored::Colorize;
use lumo_hal::SimRobot;
use lumo_runtime::{DemoConfig, init_tracing, run_demo};
use lumo_types::{CubeId, CubeSighting, Pose, Position};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    print_banner();

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    // The sequencer has no cancellation points of its own; an operator
    // interrupt simply ends the process. The physical device stops on
    // link loss.
    if let Err(e) = ctrlc::set_handler(|| {
        println!();
        println!("{}", "⚠  Ctrl-C received – aborting demo.".yellow().bold());
        std::process::exit(130);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    // ── Config vault ──────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run: default config written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Could not write default config".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    let demo_config: DemoConfig = (&cfg).into();

    // ── Simulated world ───────────────────────────────────────────────────
    // Charger already localized in the current frame; the three cubes
    // come into view during the first seconds of the look-around.
    let robot = SimRobot::builder()
        .name("lumo-sim")
        .pose(Pose::new(Position::new(0.0, 0.0, 0.0), 0.0, 1))
        .known_charger(Pose::new(Position::new(320.0, -80.0, 0.0), 0.0, 1))
        .cube_observed_after(
            Duration::from_secs(1),
            CubeSighting {
                id: CubeId(1),
                position: Position::new(150.0, 40.0, 0.0),
            },
        )
        .cube_observed_after(
            Duration::from_secs(2),
            CubeSighting {
                id: CubeId(2),
                position: Position::new(90.0, -110.0, 0.0),
            },
        )
        .cube_observed_after(
            Duration::from_secs(3),
            CubeSighting {
                id: CubeId(3),
                position: Position::new(210.0, 130.0, 0.0),
            },
        )
        .build();

    println!();
    match run_demo(&robot, &demo_config).await {
        Ok(()) => {
            println!("\n  {} Demo sequence completed.\n", "✓".green().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "demo sequence aborted");
            println!("\n  {} Demo aborted: {}\n", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"    __                   "#.bold().cyan());
    println!("{}", r#"   / /_  ______ ___  ____"#.bold().cyan());
    println!("{}", r#"  / / / / / __ `__ \/ __ \"#.bold().cyan());
    println!("{}", r#" / / /_/ / / / / / / /_/ /"#.bold().cyan());
    println!("{}", r#"/_/\__,_/_/ /_/ /_/\____/ "#.bold().cyan());
    println!();
    println!("  {}", "Lumo demo sequencer (simulated robot)".dimmed());
}
