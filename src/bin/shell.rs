//! versionkv Shell Binary
//!
//! Interactive session over a VersionDb stacked on an in-memory store.
//! Stage writes, inspect the merged view, then commit or quit.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use versionkv::memdb::MemDb;
use versionkv::{Config, Database, KeyValueReader, KeyValueWriter, KvError, VersionDb};

/// versionkv Shell
#[derive(Parser, Debug)]
#[command(name = "versionkv-shell")]
#[command(about = "Stage key-value writes in memory and commit them atomically")]
#[command(version)]
struct Args {
    /// Initial capacity of the pending buffer
    #[arg(short, long, default_value = "1024")]
    capacity: usize,

    /// Log filter (overridden by RUST_LOG)
    #[arg(short, long, default_value = "info,versionkv=debug")]
    log: String,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Get { key: String },
    Has { key: String },
    Put { key: String, value: String },
    Delete { key: String },
    Scan { prefix: String, start: String },
    Base { key: String },
    Commit,
    Pending,
    Stat { property: String },
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line; `Ok(None)` for a blank line
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        let command = match (name, args.as_slice()) {
            ("get", [key]) => ShellCommand::Get { key: key.clone() },
            ("has", [key]) => ShellCommand::Has { key: key.clone() },
            ("put", [key, value]) => ShellCommand::Put {
                key: key.clone(),
                value: value.clone(),
            },
            ("del", [key]) => ShellCommand::Delete { key: key.clone() },
            ("scan", []) => ShellCommand::Scan {
                prefix: String::new(),
                start: String::new(),
            },
            ("scan", [prefix]) => ShellCommand::Scan {
                prefix: prefix.clone(),
                start: String::new(),
            },
            ("scan", [prefix, start]) => ShellCommand::Scan {
                prefix: prefix.clone(),
                start: start.clone(),
            },
            ("base", [key]) => ShellCommand::Base { key: key.clone() },
            ("commit", []) => ShellCommand::Commit,
            ("pending", []) => ShellCommand::Pending,
            ("stat", [property]) => ShellCommand::Stat {
                property: property.clone(),
            },
            ("help", []) => ShellCommand::Help,
            ("quit", []) | ("exit", []) => ShellCommand::Quit,
            _ => return Err(format!("unrecognized command: {}", line.trim())),
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
commands:
  get <key>              read through the overlay
  has <key>              existence check through the overlay
  put <key> <value>      stage a write
  del <key>              stage a delete
  scan [prefix] [start]  merged iteration
  base <key>             read the underlying store directly
  commit                 flush staged writes atomically
  pending                number of staged keys
  stat <name>            underlying store statistic (memdb.keys, memdb.size)
  quit                   exit, discarding anything not committed";

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    tracing::info!("versionkv shell v{}", versionkv::VERSION);

    let base: Arc<dyn Database> = Arc::new(MemDb::new());
    let config = Config::builder().pending_capacity(args.capacity).build();
    let db = VersionDb::with_config(Arc::clone(&base), config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("error: {msg}");
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(e) = execute(&db, base.as_ref(), command) {
            println!("error: {e}");
        }
    }

    if let Ok(pending) = db.pending_len() {
        if pending > 0 {
            tracing::info!(pending, "discarding uncommitted writes");
        }
    }
    if let Err(e) = db.close() {
        tracing::error!("Failed to close overlay: {}", e);
    }
}

/// Run one command against the overlay and print its result
fn execute(db: &VersionDb, base: &dyn Database, command: ShellCommand) -> Result<(), KvError> {
    match command {
        ShellCommand::Get { key } => print_lookup(db.get(key.as_bytes()))?,
        ShellCommand::Has { key } => println!("{}", db.has(key.as_bytes())?),
        ShellCommand::Put { key, value } => {
            db.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        ShellCommand::Delete { key } => {
            db.delete(key.as_bytes())?;
            println!("OK");
        }
        ShellCommand::Scan { prefix, start } => {
            let mut iter =
                db.new_iterator_with_start_and_prefix(start.as_bytes(), prefix.as_bytes())?;
            let mut count = 0;
            while iter.next() {
                println!(
                    "{} = {}",
                    String::from_utf8_lossy(iter.key()),
                    String::from_utf8_lossy(iter.value())
                );
                count += 1;
            }
            iter.release();
            println!("({count} entries)");
        }
        ShellCommand::Base { key } => print_lookup(base.get(key.as_bytes()))?,
        ShellCommand::Commit => {
            db.commit()?;
            println!("OK");
        }
        ShellCommand::Pending => println!("{}", db.pending_len()?),
        ShellCommand::Stat { property } => println!("{}", db.stat(&property)?),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Print a lookup result, treating NotFound as an answer rather than an error
fn print_lookup(result: Result<bytes::Bytes, KvError>) -> Result<(), KvError> {
    match result {
        Ok(value) => println!("{}", String::from_utf8_lossy(&value)),
        Err(KvError::NotFound) => println!("(not found)"),
        Err(e) => return Err(e),
    }
    Ok(())
}
