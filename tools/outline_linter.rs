/// Outline Linter — static authoring checks for outline files.
///
/// Usage: outline-linter <outline_file>
///
/// Errors: bracket bodies that are neither tables nor valid selection
/// expressions, empty top-level tables, tables whose every leaf rolls the
/// table itself. Warnings: single-branch tables (no variety).

use rolltable::core::outline::Outline;
use rolltable::core::select;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: outline-linter <outline_file>");
        process::exit(0);
    }

    let path = &args[1];
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("ERROR: failed to read '{}': {}", path, e);
            process::exit(1);
        }
    };

    let outline = Outline::compile(&text);
    let names: Vec<String> = outline.tables().map(String::from).collect();
    println!("Loaded {} tables from {}", names.len(), path);

    let (errors, warnings) = lint_outline(&outline, &names);

    println!("\n=== Outline Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_outline(outline: &Outline, names: &[String]) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for name in names {
        let branches = match outline.branches(name) {
            Some(branches) => branches,
            None => continue,
        };

        if branches.is_empty() {
            errors.push(format!(
                "Table '{}' has no branches (a top-level line with no children)",
                name
            ));
            continue;
        }

        if branches.len() == 1 {
            warnings.push(format!(
                "Table '{}' has a single branch (no variety)",
                name
            ));
        }

        // Validate every bracket body in every leaf; rolling only exercises
        // one branch at a time, so broken expressions can hide for a while.
        let mut all_self_referencing = true;
        for branch in &branches {
            let leaf = match branch.last() {
                Some(leaf) => leaf,
                None => continue,
            };
            let mut self_referencing = false;
            for body in bracket_bodies(leaf) {
                if outline.contains(&body) {
                    if &body == name {
                        self_referencing = true;
                    }
                    continue;
                }
                if let Err(e) = select::classify(&body) {
                    errors.push(format!("Table '{}', leaf '{}': {}", name, leaf, e));
                }
            }
            if !self_referencing {
                all_self_referencing = false;
            }
        }

        if all_self_referencing {
            errors.push(format!(
                "Table '{}' has no non-recursive branch (every leaf rolls '{}' again)",
                name, name
            ));
        }
    }

    (errors, warnings)
}

/// Innermost bracket bodies of a leaf, in scan order. Nested spans report
/// the inner body only; the outer remainder is opaque until expansion.
fn bracket_bodies(text: &str) -> Vec<String> {
    let mut bodies = Vec::new();
    let mut from = 0;
    while let Some(rel) = text[from..].find(']') {
        let close = from + rel;
        if let Some(open) = text[..close].rfind('[') {
            if open >= from {
                bodies.push(text[open + 1..close].to_string());
            }
        }
        from = close + 1;
    }
    bodies
}
