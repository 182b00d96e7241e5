// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results as a table or JSON
// 5. Exit with proper code (0 = success, 1 = broken links / failed URLs, 2 = error)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
// (the crawl engine itself lives in the library, see src/lib.rs)
mod cli;        // src/cli.rs - command-line parsing
mod logging;    // src/logging.rs - tracing setup

use clap::Parser;
use cli::{Cli, Commands, CrawlArgs, KeywordArgs};
use crawlscope::crawl::{self, CrawlReport};
use crawlscope::keywords::{self, KeywordEntry, UrlKeywords};
use std::sync::atomic::{AtomicBool, Ordering};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = nothing broken
//   Ok(1) = broken links found, or some keyword URLs failed
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
        Commands::Keywords(args) => handle_keywords(&args).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let config = args.to_config();
    if !args.json {
        println!("🔍 Crawling website: {}", args.start_url);
        println!("📊 Max pages: {}, concurrency: {}", config.max_pages, config.concurrency);
    }

    let crawler = crawl::http_crawler(config)?;

    // First Ctrl-C stops the crawl after the current batch; a second one
    // quits right away (130 = killed by SIGINT)
    let cancel = crawler.cancel_flag();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if should_abort(&cancel) {
                eprintln!("\n⏹️  Aborted");
                std::process::exit(130);
            }
            eprintln!("\n⏹️  Stopping after the current batch (Ctrl-C again to quit)...");
        }
    });

    let report = crawler.crawl(&args.start_url).await?;

    if let Some(path) = &args.sitemap {
        let written = crawl::write_sitemap(path, report.internal.iter().map(|link| link.url.as_str()))?;
        if !args.json {
            println!("🗺️  Sitemap with {} URL(s) saved to {}", written, path.display());
        }
    }

    if args.json {
        print_crawl_json(&report, args.extended)?;
    } else {
        print_crawl_table(&report, args.extended);
    }

    if report.has_broken_links() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Raises the cancel flag. Returns true when it was already raised, i.e. this
// is the second interrupt and the user wants out now.
fn should_abort(cancel: &AtomicBool) -> bool {
    cancel.swap(true, Ordering::SeqCst)
}

// Handles the 'keywords' subcommand
async fn handle_keywords(args: &KeywordArgs) -> Result<i32> {
    let analyzer = keywords::http_analyzer(args.to_config())?;
    let results = analyzer.analyze_urls(&args.urls).await?;

    if args.json {
        print_keywords_json(&results)?;
    } else {
        for result in &results {
            print_keywords_table(result);
        }
    }

    let failed = results.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_crawl_json(report: &CrawlReport, extended: bool) -> Result<()> {
    let json_output = if extended {
        serde_json::to_string_pretty(report)?
    } else {
        // The short form: just the internal URLs
        serde_json::to_string_pretty(&serde_json::json!({
            "start_url": report.start_url,
            "outcome": report.outcome,
            "internal_links": report.internal_urls(),
        }))?
    };
    println!("{}", json_output);
    Ok(())
}

// Prints crawl results as a human-readable table in the terminal
fn print_crawl_table(report: &CrawlReport, extended: bool) {
    println!();
    println!("{:<70} {:<30}", "INTERNAL URL", "ANCHOR TEXT");
    println!("{}", "=".repeat(100));
    for link in &report.internal {
        println!("{:<70} {:<30}", truncate(&link.url, 67), truncate(&link.anchor_text, 30));
    }

    if extended {
        println!();
        println!("{:<70} {:<30}", "EXTERNAL URL", "FOUND ON");
        println!("{}", "=".repeat(100));
        for link in &report.external {
            println!("{:<70} {:<30}", truncate(&link.url, 67), truncate(&link.source, 30));
        }
    }

    if !report.broken.is_empty() {
        println!();
        println!("{:<60} {:<15} {:<30}", "BROKEN URL", "STATUS", "FOUND ON");
        println!("{}", "=".repeat(105));
        for broken in &report.broken {
            println!(
                "{:<60} {:<15} {:<30}",
                truncate(broken.url(), 57),
                truncate(&broken.status.to_string(), 15),
                truncate(&broken.link.source, 30)
            );
        }
    }

    println!();
    println!("📊 Summary ({:?}):", report.outcome);
    if let Some(failure) = &report.seed_failure {
        println!("   ❌ Start URL unreachable: {}", failure);
    }
    println!("   📄 Pages visited: {}", report.pages_visited);
    println!("   🏠 Internal: {}", report.internal.len());
    println!("   🌐 External: {}", report.external.len());
    println!("   ❌ Broken: {}", report.broken.len());
}

fn print_keywords_json(results: &[UrlKeywords]) -> Result<()> {
    let entries: Vec<_> = results
        .iter()
        .map(|r| match &r.result {
            Ok(report) => serde_json::json!({ "url": r.url, "keywords": report }),
            Err(e) => serde_json::json!({ "url": r.url, "error": e.to_string() }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_keywords_table(result: &UrlKeywords) {
    println!();
    println!("🔍 {}", result.url);

    let report = match &result.result {
        Ok(report) => report,
        Err(e) => {
            println!("   ⚠️  {}", e);
            return;
        }
    };

    println!("   📋 Content words: {}", report.total_words);
    print_keyword_list("ONE WORD", &report.one_word);
    print_keyword_list("TWO WORDS", &report.two_word);
    print_keyword_list("THREE WORDS", &report.three_word);
}

fn print_keyword_list(title: &str, entries: &[KeywordEntry]) {
    println!();
    println!("{:<40} {:>8} {:>10} {:>10}", title, "COUNT", "SHARE", "INTEREST");
    println!("{}", "=".repeat(71));
    for entry in entries {
        let interest = entry
            .interest_over_time
            .map(|score| format!("{:.2}", score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40} {:>8} {:>10} {:>10}",
            truncate(&entry.keyword, 40),
            entry.count,
            entry.percentage,
            interest
        );
    }
}

// Shortens text for display, respecting character boundaries
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
