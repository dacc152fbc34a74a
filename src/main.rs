use clap::Parser;
use scour::cli::{Cli, Commands};
use scour::search::SearchResult;
use scour::workspace::FileEntry;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search {
            query,
            limit,
            group,
            json,
        }) => {
            let results = scour::commands::search(&query, limit, group.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&query, &results);
            }
            Ok(())
        }
        Some(Commands::List { group, json }) => {
            let files = scour::commands::list(group.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                print_files(&files);
            }
            Ok(())
        }
        Some(Commands::Get { path }) => {
            let content = scour::commands::get(&path)?;
            print!("{content}");
            Ok(())
        }
        None => {
            Cli::parse_from(["scour", "--help"]);
            Ok(())
        }
    }
}

fn print_results(query: &str, results: &[SearchResult]) {
    if results.is_empty() {
        println!("No matches found for '{query}'");
        return;
    }

    for result in results {
        println!("{} [{}] (score {:.2})", result.path, result.group, result.score);
        for line_match in &result.matches {
            println!("  {}: {}", line_match.line, line_match.text);
        }
    }
    println!("{} result(s) found", results.len());
}

fn print_files(files: &[FileEntry]) {
    if files.is_empty() {
        println!("No viewable files in workspace");
        return;
    }

    for file in files {
        println!("{} [{}] {} bytes", file.path, file.group, file.size_bytes);
    }
    println!("{} file(s)", files.len());
}
