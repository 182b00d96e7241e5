// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - crawl: walk a site and report internal, external and broken links
// - keywords: rank the words and phrases on one or more pages
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use crawlscope::config::{CrawlConfig, InterestConfig, KeywordConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "crawlscope",
    version,
    about = "Crawl a website for links and rank the keywords on its pages",
    long_about = "crawlscope crawls a website from a start page, staying on the same host, and reports \
                  every internal, external and broken link it finds. It can also rank the most frequent \
                  words and phrases on any page."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and report its links
    ///
    /// Example: crawlscope crawl https://example.com --max-pages 50
    Crawl(CrawlArgs),

    /// Rank the keywords on one or more pages
    ///
    /// Example: crawlscope keywords https://example.com/blog --top 20
    Keywords(KeywordArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Start URL (e.g., https://example.com)
    pub start_url: String,

    /// Maximum number of pages to visit
    #[arg(long, default_value_t = 100)]
    pub max_pages: usize,

    /// Pages fetched at the same time
    #[arg(long, default_value_t = 10)]
    pub concurrency: usize,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Do not probe the links found on each page
    ///
    /// Faster and lighter on the server, but broken links are only
    /// found when the crawler visits them.
    #[arg(long)]
    pub no_subprobe: bool,

    /// Print internal, external and broken links instead of just internal ones
    #[arg(long)]
    pub extended: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write the internal URLs, one per line, to this file
    #[arg(long, value_name = "FILE")]
    pub sitemap: Option<PathBuf>,
}

impl CrawlArgs {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .max_pages(self.max_pages)
            .concurrency(self.concurrency)
            .batch_delay(Duration::from_millis(self.delay_ms))
            .subprobe(!self.no_subprobe)
    }
}

#[derive(Args, Debug)]
pub struct KeywordArgs {
    /// One or more page URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Entries per list (words, two-word and three-word phrases)
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Keep stop words ("the", "and", ...) in the counts
    #[arg(long)]
    pub keep_stop_words: bool,

    /// Interest lookup service; enables interest_over_time scores
    #[arg(long, value_name = "URL")]
    pub trends_endpoint: Option<String>,

    /// How many top terms per list get an interest score
    #[arg(long, default_value_t = 5)]
    pub trends_top: usize,

    /// Minimum pause between interest lookups, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub trends_interval_ms: u64,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl KeywordArgs {
    pub fn to_config(&self) -> KeywordConfig {
        let config = KeywordConfig::default()
            .top_n(self.top)
            .filter_stop_words(!self.keep_stop_words);

        match &self.trends_endpoint {
            Some(endpoint) => config.interest(
                InterestConfig::new(endpoint.clone())
                    .top_k(self.trends_top)
                    .min_spacing(Duration::from_millis(self.trends_interval_ms)),
            ),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::parse_from(["crawlscope", "crawl", "https://example.com"]);
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl subcommand");
        };
        let config = args.to_config();
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.batch_delay, Duration::from_millis(500));
        assert!(config.subprobe);
        assert!(!args.json);
    }

    #[test]
    fn test_crawl_flags() {
        let cli = Cli::parse_from([
            "crawlscope", "-vv", "crawl", "https://example.com", "--max-pages", "5", "--concurrency", "2",
            "--no-subprobe", "--sitemap", "out.txt", "--json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Crawl(args) = cli.command else {
            panic!("expected crawl subcommand");
        };
        let config = args.to_config();
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.concurrency, 2);
        assert!(!config.subprobe);
        assert_eq!(args.sitemap, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_keywords_with_trends() {
        let cli = Cli::parse_from([
            "crawlscope", "keywords", "https://a.test", "https://b.test", "--top", "20",
            "--trends-endpoint", "http://trends.local/interest",
        ]);
        let Commands::Keywords(args) = cli.command else {
            panic!("expected keywords subcommand");
        };
        assert_eq!(args.urls.len(), 2);
        let config = args.to_config();
        assert_eq!(config.top_n, 20);
        assert!(config.filter_stop_words);
        let interest = config.interest.unwrap();
        assert_eq!(interest.endpoint, "http://trends.local/interest");
        assert_eq!(interest.top_k, 5);
    }

    #[test]
    fn test_keywords_requires_url() {
        assert!(Cli::try_parse_from(["crawlscope", "keywords"]).is_err());
    }
}
