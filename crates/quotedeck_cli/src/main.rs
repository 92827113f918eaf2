//! quotedeck command-line interface.
//!
//! Thin binary over `quotedeck_core`: one subcommand per user-visible
//! action, plus a `watch` mode hosting the periodic sync timer. All
//! configuration comes from environment variables.

use quotedeck_core::db::open_db;
use quotedeck_core::{
    default_log_level, init_logging, sync_once, HttpQuoteSource, Notice, Notifier, Quote,
    QuoteService, SqliteKvRepository, DEFAULT_REMOTE_URL, DEFAULT_SYNC_INTERVAL,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DB_FILE_NAME: &str = "quotedeck.db";
const DEFAULT_EXPORT_FILE: &str = "quotes.json";

/// Prints notices to stderr so they never mix with piped quote output.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("[notice] {}", notice.message);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let log_dir = data_dir().join("logs");
    let log_level =
        std::env::var("QUOTEDECK_LOG").unwrap_or_else(|_| default_log_level().to_string());
    if let Err(err) = init_logging(&log_level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&args) {
        Ok(()) => {}
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let command = args.first().map(String::as_str);
    match command {
        Some("add") => {
            // Same shape as watch-mode `add`: category first, then the
            // quote text, which may span the remaining arguments.
            if args.len() < 3 {
                return Err("usage: quotedeck add <category> <text>".to_string());
            }
            let category = &args[1];
            let text = args[2..].join(" ");
            let mut service = open_service()?;
            service.add(&text, category).map_err(|err| err.to_string())?;
            println!("Quote added!");
            Ok(())
        }
        Some("random") => {
            let mut service = open_service()?;
            let category = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| service.selected_category().to_string());
            match service.pick_random(&category) {
                Some(quote) => print_quote(&quote),
                None => println!("No quotes available in this category."),
            }
            Ok(())
        }
        Some("list") => {
            let service = open_service()?;
            let category = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| service.selected_category().to_string());
            print_filtered(&service, &category);
            Ok(())
        }
        Some("categories") => {
            let service = open_service()?;
            for category in service.categories() {
                println!("{category}");
            }
            Ok(())
        }
        Some("filter") => {
            let mut service = open_service()?;
            match args.get(1) {
                Some(category) => {
                    service
                        .set_selected_category(category)
                        .map_err(|err| err.to_string())?;
                    print_filtered(&service, category);
                }
                None => println!("{}", service.selected_category()),
            }
            Ok(())
        }
        Some("last") => {
            let service = open_service()?;
            match service.last_shown() {
                Some(quote) => print_quote(&quote),
                None => println!("No quote shown yet in this session."),
            }
            Ok(())
        }
        Some("import") => {
            let [path] = require_args::<1>(args, "import <file>")?;
            let raw = std::fs::read_to_string(&path)
                .map_err(|err| format!("cannot read `{path}`: {err}"))?;
            let mut service = open_service()?;
            match service.import_json(&raw) {
                Ok(count) => {
                    println!("Quotes imported successfully! ({count} quote(s))");
                    Ok(())
                }
                Err(err) => Err(format!("invalid JSON file: {err}")),
            }
        }
        Some("export") => {
            let path = args
                .get(1)
                .cloned()
                .unwrap_or_else(|| DEFAULT_EXPORT_FILE.to_string());
            let service = open_service()?;
            let json = service.export_json().map_err(|err| err.to_string())?;
            std::fs::write(&path, json).map_err(|err| format!("cannot write `{path}`: {err}"))?;
            println!("Exported {} quote(s) to {path}", service.len());
            Ok(())
        }
        Some("sync") => {
            let mut service = open_service()?;
            let source = HttpQuoteSource::new(remote_url());
            sync_once(&mut service, &source, &StderrNotifier).map_err(|err| err.to_string())?;
            Ok(())
        }
        Some("watch") => run_watch(),
        Some("version") => {
            println!("quotedeck {}", quotedeck_core::core_version());
            Ok(())
        }
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("unknown command `{other}`; run `quotedeck help`")),
    }
}

/// Interactive loop with the periodic sync running in the background.
fn run_watch() -> Result<(), String> {
    let service = Arc::new(Mutex::new(open_service()?));

    quotedeck_core::spawn_sync_scheduler(
        Arc::clone(&service),
        HttpQuoteSource::new(remote_url()),
        StderrNotifier,
        sync_interval(),
    );
    let manual_source = HttpQuoteSource::new(remote_url());

    println!(
        "quotedeck watch mode (sync every {}s).",
        sync_interval().as_secs()
    );
    println!(
        "Commands: random [category] | list [category] | categories | filter [category] | add <category> <text> | last | sync | quit"
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| err.to_string())?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (line, ""),
        };

        let mut service = service
            .lock()
            .map_err(|_| "service lock poisoned".to_string())?;

        match command {
            "random" => {
                let category = if rest.is_empty() {
                    service.selected_category().to_string()
                } else {
                    rest.to_string()
                };
                match service.pick_random(&category) {
                    Some(quote) => print_quote(&quote),
                    None => println!("No quotes available in this category."),
                }
            }
            "list" => {
                let category = if rest.is_empty() {
                    service.selected_category().to_string()
                } else {
                    rest.to_string()
                };
                print_filtered(&service, &category);
            }
            "categories" => {
                for category in service.categories() {
                    println!("{category}");
                }
            }
            "filter" => {
                if rest.is_empty() {
                    println!("{}", service.selected_category());
                } else {
                    match service.set_selected_category(rest) {
                        Ok(()) => print_filtered(&service, rest),
                        Err(err) => eprintln!("error: {err}"),
                    }
                }
            }
            "add" => match rest.split_once(char::is_whitespace) {
                Some((category, text)) => match service.add(text, category) {
                    Ok(_) => println!("Quote added!"),
                    Err(err) => eprintln!("error: {err}"),
                },
                None => eprintln!("usage: add <category> <text>"),
            },
            "last" => match service.last_shown() {
                Some(quote) => print_quote(&quote),
                None => println!("No quote shown yet in this session."),
            },
            "sync" => {
                let _ = sync_once(&mut service, &manual_source, &StderrNotifier);
            }
            "quit" | "exit" => break,
            other => eprintln!("unknown command `{other}`"),
        }
    }

    Ok(())
}

fn open_service() -> Result<QuoteService<SqliteKvRepository>, String> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("cannot create data directory `{}`: {err}", dir.display()))?;
    let conn = open_db(dir.join(DB_FILE_NAME)).map_err(|err| err.to_string())?;
    let repo = SqliteKvRepository::try_new(conn).map_err(|err| err.to_string())?;
    QuoteService::load(repo).map_err(|err| err.to_string())
}

fn data_dir() -> PathBuf {
    let dir = match std::env::var("QUOTEDECK_DATA_DIR") {
        Ok(custom) => PathBuf::from(custom),
        Err(_) => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".quotedeck"),
            Err(_) => PathBuf::from(".quotedeck"),
        },
    };

    if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&dir))
            .unwrap_or(dir)
    }
}

fn remote_url() -> String {
    std::env::var("QUOTEDECK_REMOTE_URL").unwrap_or_else(|_| DEFAULT_REMOTE_URL.to_string())
}

fn sync_interval() -> Duration {
    std::env::var("QUOTEDECK_SYNC_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SYNC_INTERVAL)
}

fn require_args<const N: usize>(args: &[String], usage: &str) -> Result<[String; N], String> {
    let supplied = args[1..].to_vec();
    if supplied.len() != N {
        return Err(format!("usage: quotedeck {usage}"));
    }
    supplied
        .try_into()
        .map_err(|_| format!("usage: quotedeck {usage}"))
}

fn print_quote(quote: &Quote) {
    println!("\"{}\"", quote.text);
    println!("  -- {}", quote.category);
}

fn print_filtered(service: &QuoteService<SqliteKvRepository>, category: &str) {
    let filtered = service.filter(category);
    if filtered.is_empty() {
        println!("No quotes in this category.");
        return;
    }
    for quote in filtered {
        print_quote(quote);
    }
}

fn print_help() {
    println!("quotedeck - local-first quote collection manager");
    println!();
    println!("Usage: quotedeck <command> [args]");
    println!();
    println!("Commands:");
    println!("  add <category> <text>   Add a quote (both fields required)");
    println!("  random [category]       Show a random quote from the active filter");
    println!("  list [category]         List quotes in a category (default: active filter)");
    println!("  categories              List known categories");
    println!("  filter [category]       Show or set the persisted category filter");
    println!("  last                    Show the last randomly picked quote of this session");
    println!("  import <file>           Import a JSON array of quotes");
    println!(
        "  export [file]           Export all quotes as JSON (default: {DEFAULT_EXPORT_FILE})"
    );
    println!("  sync                    Run one fetch-and-merge round against the server");
    println!("  watch                   Interactive mode with periodic background sync");
    println!("  version                 Print the version");
    println!("  help                    Show this help");
    println!();
    println!("Environment:");
    println!("  QUOTEDECK_DATA_DIR      Data directory (default: ~/.quotedeck)");
    println!("  QUOTEDECK_REMOTE_URL    Sync endpoint (default: {DEFAULT_REMOTE_URL})");
    println!("  QUOTEDECK_SYNC_SECS     Sync interval in watch mode (default: 60)");
    println!("  QUOTEDECK_LOG           Log level (trace|debug|info|warn|error)");
}
