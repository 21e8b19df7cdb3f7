use anyhow::{Context, Result};
use blockwright_config::Config;
use blockwright_engine::{
    CompositionTree, EditNode, Registry, blocks, composing::invariants, edit_snapshot,
    parse_document, save_checked,
};
use std::{env, fs, path::PathBuf, process, sync::Arc};

enum Mode {
    /// Print an outline of the edit view (default).
    Outline,
    /// Re-emit the serialized document after a determinism check.
    Emit,
    /// Verify round-trip stability and exit.
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut mode = Mode::Outline;
    let mut path_arg = None;
    let args: Vec<String> = env::args().collect();
    for arg in &args[1..] {
        match arg.as_str() {
            "--emit" => mode = Mode::Emit,
            "--check" => mode = Mode::Check,
            "--help" | "-h" => {
                println!("Usage: {} [document-path] [--check|--emit]", args[0]);
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("Unknown flag: {flag}");
                eprintln!("Usage: {} [document-path] [--check|--emit]", args[0]);
                process::exit(2);
            }
            path => path_arg = Some(PathBuf::from(path)),
        }
    }

    // Fall back to the config file when no path argument was given.
    let mut strict = false;
    let path = match path_arg {
        Some(path) => path,
        None => match Config::load() {
            Ok(Some(config)) => {
                strict = config.strict;
                config.content_path
            }
            Ok(None) => {
                eprintln!("Error: no document path given and no config file found");
                eprintln!("Usage: {} [document-path] [--check|--emit]", args[0]);
                eprintln!("Or create a config file at {}", Config::config_path().display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: failed to load config file: {e}");
                process::exit(1);
            }
        },
    };

    let input = fs::read_to_string(&path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let nodes = parse_document(&input)
        .with_context(|| format!("failed to parse document {}", path.display()))?;

    let registry = Arc::new(Registry::new());
    blocks::register_builtins(&registry)?;
    let tree = CompositionTree::from_nodes(registry, nodes);

    let violations = invariants::check(&tree);
    for violation in &violations {
        eprintln!("warning: {violation}");
    }
    if strict && !violations.is_empty() {
        eprintln!("Error: {} constraint violation(s) in strict mode", violations.len());
        process::exit(1);
    }

    match mode {
        Mode::Outline => {
            let snapshot = edit_snapshot(&tree);
            for issue in &snapshot.issues {
                eprintln!("warning: {}: {}", issue.path, issue.error);
            }
            for node in &snapshot.nodes {
                print_outline(node, 0);
            }
        }
        Mode::Emit => {
            let saved = save_checked(&tree)?;
            for issue in &saved.issues {
                eprintln!("warning: {}: {}", issue.path, issue.error);
            }
            println!("{}", saved.markup);
        }
        Mode::Check => {
            let saved = save_checked(&tree)?;
            let reparsed = parse_document(&saved.markup)
                .context("re-parsing our own save output failed")?;
            let stable = reparsed.len() == tree.roots().len()
                && tree
                    .roots()
                    .iter()
                    .zip(&reparsed)
                    .all(|(a, b)| a.structurally_equal(b));
            if !stable {
                eprintln!("Error: save output did not re-parse to an equivalent tree");
                process::exit(1);
            }
            println!(
                "ok: {} root block(s), round-trip stable, {} warning(s)",
                tree.roots().len(),
                violations.len()
            );
        }
    }

    Ok(())
}

fn print_outline(node: &EditNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.missing {
        println!("{indent}{} (unregistered)", node.name);
    } else {
        println!("{indent}{}", node.name);
    }
    for child in &node.children {
        print_outline(child, depth + 1);
    }
}
