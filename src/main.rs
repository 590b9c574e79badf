//! CLI entry point for vnquiz
//!
//! This provides the terminal player and stage validation.

use std::path::PathBuf;
use std::process;
use vnquiz::cli::play::{PlayOptions, run_play};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    let result = match command.as_str() {
        "play" => match parse_play(&args[2..]) {
            Ok(options) => run_play(options).await,
            Err(message) => {
                eprintln!("Error: {message}");
                eprintln!();
                print_usage();
                process::exit(1);
            }
        },
        "check" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: Missing stage file path");
                eprintln!();
                print_usage();
                process::exit(1);
            };
            vnquiz::cli::run_check(&PathBuf::from(path)).await.map(|_| ())
        }
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn parse_play(args: &[String]) -> Result<PlayOptions, String> {
    let mut positional = Vec::new();
    let mut name = None;
    let mut config = None;
    let mut debug = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" => debug = true,
            "--name" => name = Some(iter.next().ok_or("--name needs a value")?.clone()),
            "--config" => {
                config = Some(PathBuf::from(iter.next().ok_or("--config needs a value")?))
            }
            _ => positional.push(arg.clone()),
        }
    }

    let [stage_dir, stage] = positional.as_slice() else {
        return Err("expected <stage_dir> <stage>".to_string());
    };
    let stage = stage
        .parse::<u32>()
        .map_err(|_| format!("invalid stage number '{stage}'"))?;

    Ok(PlayOptions {
        stage_dir: PathBuf::from(stage_dir),
        stage,
        name,
        config,
        debug,
    })
}

fn print_usage() {
    println!("vnquiz - Visual novel quiz engine");
    println!();
    println!("USAGE:");
    println!("    vnquiz play <stage_dir> <stage> [--name NAME] [--config FILE] [--debug]");
    println!("    vnquiz check <stage.json>");
    println!();
    println!("COMMANDS:");
    println!("    play     Play a stage from <stage_dir>/stage_<n>.json in the terminal");
    println!("    check    Validate a stage file and list authoring warnings");
    println!("    --help, -h               Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --debug    Show engine state after every step");
    println!();
    println!("The player name and reward ledger are saved to <stage_dir>/client_store.json.");
    println!("Score and stage are not saved: each play run starts them from 0, and a stage");
    println!("rewarded in an earlier run is not credited again.");
    println!();
    println!("Set RUST_LOG=vnquiz=debug (or vnquiz::flow=debug) for log output.");
}
