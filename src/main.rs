use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::Parser;
use rustyline::DefaultEditor;

use ledgerdb::{Catalog, display};

#[derive(Parser, Debug)]
#[command(name = "ledgerdb")]
#[command(about = "A small disk-backed relational engine", long_about = None)]
struct Args {
    /// Wipe the data directory and exit.
    #[arg(long)]
    init: bool,

    /// Suppress the interactive banner and echoed results.
    #[arg(short, long)]
    batch: bool,

    /// Import newline-delimited statements from a file.
    #[arg(short, long, value_name = "PATH")]
    file: Option<String>,

    /// Table context for --file (both or neither must be given).
    #[arg(short, long, value_name = "TABLE")]
    table: Option<String>,

    /// Database to select at startup (runs `USE <db>`).
    #[arg(short, long, value_name = "DB")]
    database: Option<String>,

    /// Data directory path.
    #[arg(long, default_value = "./data")]
    data_dir: String,
}

fn main() {
    let args = Args::parse();

    if args.file.is_some() != args.table.is_some() {
        eprintln!("--file/-f and --table/-t must be given together");
        std::process::exit(1);
    }

    if args.init {
        if Path::new(&args.data_dir).exists()
            && let Err(e) = fs::remove_dir_all(&args.data_dir)
        {
            eprintln!("failed to remove existing data directory: {e}");
            std::process::exit(1);
        }
        match Catalog::new(&args.data_dir) {
            Ok(_) => {
                println!("database initialized at: {}", args.data_dir);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("failed to initialize catalog: {e}");
                std::process::exit(1);
            }
        }
    }

    let mut catalog = match Catalog::new(&args.data_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to initialize catalog: {e}");
            std::process::exit(1);
        }
    };

    if let Some(db_name) = &args.database {
        let message = catalog.execute(&format!("USE {db_name}"));
        if !args.batch {
            println!("{message}");
        }
    }

    if let (Some(file_path), Some(_table)) = (&args.file, &args.table) {
        if let Err(e) = run_batch_file(&mut catalog, file_path, args.batch) {
            eprintln!("failed to import {file_path}: {e}");
            std::process::exit(1);
        }
        return;
    }

    run_interactive(&mut catalog, args.batch);
}

fn run_batch_file(catalog: &mut Catalog, path: &str, batch: bool) -> std::io::Result<()> {
    let file = fs::File::open(path)?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let result = catalog.execute(line);
        if !batch {
            println!("{result}");
        }
    }
    Ok(())
}

/// A local meta-command recognized by the prompt loop before any text
/// reaches the catalog. `Cancel` is only valid while a statement is
/// being accumulated; the others only at the start of a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaCommand {
    Help,
    Clear,
    Exit,
    Cancel,
}

fn classify_meta(line: &str, mid_statement: bool) -> Option<MetaCommand> {
    let lowered = line.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "cancel" if mid_statement => Some(MetaCommand::Cancel),
        "help" if !mid_statement => Some(MetaCommand::Help),
        "clear" if !mid_statement => Some(MetaCommand::Clear),
        "exit" if !mid_statement => Some(MetaCommand::Exit),
        _ => None,
    }
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

fn print_banner() {
    println!();
    println!("{}", display::prompt("+------------------------------------------+"));
    println!("{}", display::title("          ledgerdb SQL engine"));
    println!("{}", display::prompt("+------------------------------------------+"));
    println!();
    println!("{}", display::title("Quick start:"));
    println!("  {} t (id INT, name TEXT);", display::highlight("CREATE TABLE"));
    println!("  {} t VALUES (1, 'Alice');", display::highlight("INSERT INTO"));
    println!("  {} * FROM t WHERE id > 0;", display::highlight("SELECT"));
    println!();
    println!("{}", display::title("Commands:"));
    println!("  {} - show this guide", display::highlight("help"));
    println!("  {} - clear the screen", display::highlight("clear"));
    println!("  {} - leave the prompt", display::highlight("exit"));
    println!("  {} - discard the statement being typed", display::highlight("cancel"));
    println!();
}

fn run_interactive(catalog: &mut Catalog, batch: bool) {
    if !batch {
        print_banner();
    }

    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() {
            format!("{} ", display::prompt("sql>"))
        } else {
            format!("{} ", display::dim_text("  ..."))
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(_) => break,
        };
        let _ = editor.add_history_entry(line.as_str());

        let mid_statement = !buffer.is_empty();
        if let Some(meta) = classify_meta(&line, mid_statement) {
            match meta {
                MetaCommand::Help => {
                    if !batch {
                        print_banner();
                    }
                }
                MetaCommand::Clear => {
                    if !batch {
                        clear_screen();
                        print_banner();
                    }
                }
                MetaCommand::Exit => break,
                MetaCommand::Cancel => {
                    buffer.clear();
                    if !batch {
                        println!("{}", display::warning_line("Query cancelled."));
                    }
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        buffer.push_str(trimmed);
        buffer.push(' ');

        if buffer.contains(';') {
            let statement = buffer.trim().trim_end_matches(';').trim().to_string();
            buffer.clear();
            if statement.is_empty() {
                continue;
            }
            let result = catalog.execute(&statement);
            println!("{result}");
        }
    }
}
