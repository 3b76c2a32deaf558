/// Preview — rolls sample results from an outline file.
///
/// Usage: preview <outline_file> [--table <name>] [--count <n>] [--seed <n>]

use rolltable::core::engine::RollEngine;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: preview <outline_file> [--table <name>] [--count <n>] [--seed <n>]");
        process::exit(0);
    }

    let path = &args[1];
    let mut table: Option<String> = None;
    let mut count: usize = 5;
    let mut seed: u64 = 0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--table" if i + 1 < args.len() => {
                i += 1;
                table = Some(args[i].clone());
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or(count);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(seed);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("ERROR: failed to read '{}': {}", path, e);
            process::exit(1);
        }
    };

    let mut engine = RollEngine::from_text(&text).with_seed(seed);
    let names: Vec<String> = engine.tables().map(String::from).collect();
    if names.is_empty() {
        eprintln!("ERROR: no tables found in '{}'", path);
        process::exit(1);
    }

    let targets: Vec<String> = match table {
        Some(name) => {
            if !engine.has_table(&name) {
                eprintln!(
                    "ERROR: no table named '{}' (available: {})",
                    name,
                    names.join(", ")
                );
                process::exit(1);
            }
            vec![name]
        }
        None => names,
    };

    for name in &targets {
        println!("=== {} ===", name);
        for _ in 0..count {
            match engine.roll(name) {
                Ok(roll) => println!("  {}", roll),
                Err(e) => {
                    eprintln!("  ERROR: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
