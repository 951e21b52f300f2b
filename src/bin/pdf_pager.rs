//! Page through, search and outline a PDF from the terminal.
//!
//! Usage:
//!   pdf_pager <file.pdf> [command] [--json] [--cache N]
//!
//! Commands:
//!   info                          Document metadata and page count (default)
//!   page N                        Text of page N
//!   range A B                     Text of pages A through B
//!   search QUERY [--case] [--word] [--regex] [--max N] [--pages A B]
//!   outline                       Bookmarks or detected headings
//!
//! Set `RUST_LOG=debug` for extraction and cache logs.

use pdf_pager::search::matching::search_chars;
use pdf_pager::search::{SearchHistory, SearchOptions, find_all_positions, highlight_matches};
use pdf_pager::{Document, PagerConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "Usage: pdf_pager <file.pdf> [info | page N | range A B | \
search QUERY [--case] [--word] [--regex] [--max N] [--pages A B] | outline] \
[--json] [--cache N]";

enum Command {
    Info,
    Page(usize),
    Range(usize, usize),
    Search(String, SearchOptions),
    Outline,
}

struct CliConfig {
    path: PathBuf,
    command: Command,
    json: bool,
    cache_capacity: Option<usize>,
}

fn parse_number<T: std::str::FromStr>(
    args: &[String],
    i: usize,
    flag: &str,
) -> Result<T, String> {
    let value = args
        .get(i)
        .ok_or_else(|| format!("{} expects a number", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, value))
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let path = args.get(1).ok_or_else(|| USAGE.to_string())?;
        if path == "--help" || path == "-h" {
            return Err(USAGE.to_string());
        }

        let mut command = Command::Info;
        let mut options = SearchOptions::new();
        let mut json = false;
        let mut cache_capacity = None;

        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "info" => command = Command::Info,
                "outline" => command = Command::Outline,
                "page" => {
                    i += 1;
                    command = Command::Page(parse_number(&args, i, "page")?);
                },
                "range" => {
                    let start = parse_number(&args, i + 1, "range")?;
                    let end = parse_number(&args, i + 2, "range")?;
                    command = Command::Range(start, end);
                    i += 2;
                },
                "search" => {
                    i += 1;
                    let query = args.get(i).ok_or("search expects a query")?;
                    command = Command::Search(query.clone(), SearchOptions::new());
                },
                "--case" => options.case_sensitive = true,
                "--word" => options.whole_word = true,
                "--regex" => options.regex_mode = true,
                "--max" => {
                    i += 1;
                    options.max_results = parse_number(&args, i, "--max")?;
                },
                "--pages" => {
                    options.start_page = parse_number(&args, i + 1, "--pages")?;
                    options.end_page = parse_number(&args, i + 2, "--pages")?;
                    i += 2;
                },
                "--json" => json = true,
                "--cache" => {
                    i += 1;
                    cache_capacity = Some(parse_number(&args, i, "--cache")?);
                },
                other => return Err(format!("Unknown argument '{}'\n{}", other, USAGE)),
            }
            i += 1;
        }

        if let Command::Search(_, search_options) = &mut command {
            *search_options = options;
        }

        Ok(Self {
            path: PathBuf::from(path),
            command,
            json,
            cache_capacity,
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut pager_config = PagerConfig::default();
    if let Some(capacity) = config.cache_capacity {
        pager_config = pager_config.with_cache_capacity(capacity);
    }
    let doc = Document::open_with_config(&config.path, pager_config)?;

    match config.command {
        Command::Info => {
            let meta = doc.metadata();
            if config.json {
                return print_json(&meta);
            }
            println!("File:    {}", meta.file_path);
            println!("Pages:   {}", meta.pages);
            println!("Title:   {}", meta.title);
            if !meta.author.is_empty() {
                println!("Author:  {}", meta.author);
            }
            if !meta.subject.is_empty() {
                println!("Subject: {}", meta.subject);
            }
            if !meta.creator.is_empty() {
                println!("Creator: {}", meta.creator);
            }
        },
        Command::Page(page) => {
            let info = doc.get_page(page)?;
            if config.json {
                return print_json(&info);
            }
            println!("{}", info.text);
            eprintln!(
                "-- page {}/{} ({} lines, {} words) --",
                page,
                doc.page_count(),
                info.line_count,
                info.word_count
            );
        },
        Command::Range(start, end) => {
            let text = doc.get_page_range(start, end)?;
            if config.json {
                return print_json(&text);
            }
            print!("{}", text);
        },
        Command::Search(query, options) => {
            let results = doc.advanced_search(&query, &options)?;
            let mut history = SearchHistory::new(doc.config().history_size);
            history.record(&query, &options, results.len());

            if config.json {
                return print_json(&results);
            }
            for hit in &results {
                let preview = if options.regex_mode {
                    hit.preview.clone()
                } else {
                    let positions = find_all_positions(
                        &search_chars(&hit.preview, options.case_sensitive),
                        &search_chars(&query, options.case_sensitive),
                        false,
                    );
                    highlight_matches(&hit.preview, &positions, query.chars().count())
                };
                println!(
                    "p{}:{}:{}  [{:.2}, {} on page]  {}",
                    hit.result.page_num,
                    hit.result.line_num,
                    hit.result.column_num,
                    hit.relevance,
                    hit.match_count,
                    preview
                );
            }
            if let Some(entry) = history.get(0) {
                eprintln!(
                    "{} result(s) for '{}' at {}",
                    entry.result_count,
                    entry.query,
                    entry.timestamp.format("%H:%M:%S")
                );
            }
        },
        Command::Outline => {
            let outline = doc.extract_outline()?;
            if config.json {
                return print_json(&outline);
            }
            if outline.is_empty() {
                println!("No outline found");
            } else {
                print!("{}", outline.format());
            }
        },
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        },
    };

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
