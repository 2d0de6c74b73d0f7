//! Life Distributor CLI - Run Game of Life from JSON configuration.

use std::fs;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crossbeam::channel;

use life_distributor::{
    distributor::run,
    event::{Event, RunState},
    image::{PgmStore, write_pgm},
    schema::{RunConfig, Seed},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Run Game of Life from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration file");
        eprintln!();
        eprintln!("Keys (type then press enter):");
        eprintln!("  p  pause / advance one turn while paused");
        eprintln!("  s  save the current grid");
        eprintln!("  q  save and quit");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.params.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }
    let params = config.params.clone();

    let store = PgmStore::new(&config.input_dir, &config.output_dir).unwrap_or_else(|e| {
        eprintln!("Error opening image store: {}", e);
        std::process::exit(1);
    });

    // Generate the input image from a seed if it does not exist yet
    let input_path = store.input_path(&params.input_name());
    if !input_path.exists() {
        let seed_path = config_path.with_extension("seed.json");
        let seed: Seed = if seed_path.exists() {
            let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
                eprintln!("Error reading seed file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&seed_str).unwrap_or_else(|e| {
                eprintln!("Error parsing seed: {}", e);
                std::process::exit(1);
            })
        } else {
            Seed::default()
        };

        let grid = seed.generate(params.image_width, params.image_height);
        let written = fs::create_dir_all(&config.input_dir)
            .map_err(|e| e.to_string())
            .and_then(|_| {
                write_pgm(&input_path, grid.width(), grid.height(), &grid.to_bytes())
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = written {
            eprintln!("Error writing seeded input image: {}", e);
            std::process::exit(1);
        }
        println!("Generated {} from seed", input_path.display());
    }

    println!("Game of Life");
    println!("============");
    println!("Grid: {}x{}", params.image_width, params.image_height);
    println!("Turns: {}", params.turns);
    println!("Threads: {}", params.threads);
    println!("Input: {}", input_path.display());
    println!("Output: {}", config.output_dir.display());
    println!();

    let (events_tx, events_rx) = channel::unbounded();
    let (keys_tx, keys_rx) = channel::unbounded();

    // Key presses come from stdin, one command character per line
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for key in line.chars() {
                if keys_tx.send(key).is_err() {
                    return;
                }
            }
        }
    });

    let start = Instant::now();
    let turns = params.turns;
    let runner = thread::spawn(move || run(params, store, events_tx, keys_rx));

    let mut final_alive = None;
    for event in events_rx.iter() {
        match &event {
            Event::TurnComplete { completed_turns } => {
                // Print progress every 10%
                if *completed_turns > 0 && completed_turns % (turns / 10).max(1) == 0 {
                    let elapsed = start.elapsed().as_secs_f32();
                    println!(
                        "  Turn {}/{}: {:.1} turns/s",
                        completed_turns,
                        turns,
                        *completed_turns as f32 / elapsed
                    );
                }
            }
            Event::AliveCellsCount { .. } => println!("  {}", event),
            Event::StateChange { new_state, .. } if *new_state != RunState::Quitting => {
                println!("  {}", event)
            }
            Event::FinalTurnComplete { alive, .. } => final_alive = Some(alive.len()),
            _ => {}
        }
    }

    let summary = match runner.join() {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            eprintln!("Run failed: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("Run panicked");
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();
    println!();
    println!("Final state:");
    println!("  Completed turns: {}", summary.completed_turns);
    println!(
        "  Alive cells: {}",
        final_alive.unwrap_or_else(|| summary.grid.alive_count())
    );
    if summary.quit {
        println!("  Quit before the configured {} turns", turns);
    }
    println!(
        "Time: {:.2}s ({:.1} turns/s)",
        elapsed.as_secs_f32(),
        summary.completed_turns as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = RunConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example seed (config.seed.json):");
    println!("{}", serde_json::to_string_pretty(&seed).unwrap());
}
