// Standalone tool for inspecting and re-running replay logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay every recorded tick
//   --last <n>             Show the newest n ticks of one snake (needs --snake)
//   --snake <id>           Restrict to one snake
//   --deaths               Print the final-length leaderboard
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use lee_snake::config::Config;
use lee_snake::replay::ReplayEngine;

enum Mode {
    All,
    Last(usize),
    Deaths,
}

fn print_usage() {
    eprintln!("Lee Snake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every recorded tick and compare moves");
    eprintln!("  --last <N>              Show the newest N ticks of the snake given by --snake");
    eprintln!("  --snake <ID>            Only consider ticks of this snake");
    eprintln!("  --deaths                Print final lengths of dead snakes, longest first");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay lee_snake_replay.jsonl --all");
    eprintln!("  replay lee_snake_replay.jsonl --all --snake abc123 --verbose");
    eprintln!("  replay lee_snake_replay.jsonl --last 5 --snake abc123");
    eprintln!("  replay lee_snake_replay.jsonl --deaths");
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut snake_id: Option<String> = None;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--deaths" => mode = Some(Mode::Deaths),
            "--last" => {
                let raw = option_value(&args, i, "--last");
                match raw.parse::<usize>() {
                    Ok(n) => mode = Some(Mode::Last(n)),
                    Err(e) => {
                        eprintln!("Error: invalid tick count '{}': {}", raw, e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--snake" => {
                snake_id = Some(option_value(&args, i, "--snake").to_string());
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --last, or --deaths");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => match engine.replay_all(&entries, snake_id.as_deref()) {
            Ok(results) => engine.print_report(&results),
            Err(e) => {
                eprintln!("Error during replay: {}", e);
                process::exit(1);
            }
        },
        Mode::Last(n) => {
            let snake_id = match snake_id {
                Some(id) => id,
                None => {
                    eprintln!("Error: --last requires --snake");
                    process::exit(1);
                }
            };
            let records = engine.last_ticks(&entries, &snake_id, n);
            if records.is_empty() {
                println!("No ticks recorded for {}", snake_id);
            }
            for record in records {
                println!("t={}  move={}", record.t, record.chosen_move);
                for row in &record.map {
                    println!("  {}", row);
                }
                println!(
                    "  {} alive snake(s), {} item(s)\n",
                    record.state.alive_snakes.len(),
                    record.state.items.len()
                );
            }
        }
        Mode::Deaths => {
            let board = engine.leaderboard(&entries);
            if board.is_empty() {
                println!("No deaths recorded");
            }
            for (rank, (id, length)) in board.iter().enumerate() {
                println!("{:>3}. {:<24} {}", rank + 1, id, length);
            }
        }
    }
}
