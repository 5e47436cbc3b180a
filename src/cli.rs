use std::path::PathBuf;

use clap::{Parser, Subcommand};
use matcher_engine::catalogue::ALL_CATEGORIES;
use matcher_engine::params::{DEFAULT_THRESHOLD_PERCENT, DEFAULT_TOP_K};

#[derive(Debug, Parser)]
#[command(name = "product-matcher")]
#[command(about = "Find visually similar products from an image", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Search service base URL. Overrides PRODUCT_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one similarity search.
    Search {
        /// Local image to search with.
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Remote image URL to search with.
        #[arg(long)]
        url: Option<String>,

        /// Number of matches (clamped to 1..=24).
        #[arg(long, default_value_t = DEFAULT_TOP_K, allow_negative_numbers = true)]
        top_k: f64,

        /// Minimum similarity in percent (clamped to 0..=100).
        #[arg(long, default_value_t = DEFAULT_THRESHOLD_PERCENT, allow_negative_numbers = true)]
        threshold: f64,
    },

    /// Show the initial catalogue, optionally filtered by category.
    Catalogue {
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// List catalogue categories.
    Categories,

    /// Show products related to a product id.
    Related {
        product_id: String,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Line-oriented session over one query.
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_defaults() {
        let cli = Cli::try_parse_from(["product-matcher", "search", "--url", "http://x/y.jpg"])
            .unwrap();
        match cli.command {
            Commands::Search {
                file,
                url,
                top_k,
                threshold,
            } => {
                assert!(file.is_none());
                assert_eq!(url.as_deref(), Some("http://x/y.jpg"));
                assert_eq!(top_k, 12.0);
                assert_eq!(threshold, 0.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn api_url_is_global() {
        let cli = Cli::try_parse_from([
            "product-matcher",
            "categories",
            "--api-url",
            "http://localhost:8000",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn file_and_url_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "product-matcher",
            "search",
            "--file",
            "a.png",
            "--url",
            "http://x/y.jpg",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn out_of_range_numbers_are_accepted_for_clamping() {
        let cli = Cli::try_parse_from([
            "product-matcher",
            "search",
            "--url",
            "http://x",
            "--top-k",
            "-3",
            "--threshold",
            "150",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Search { top_k, threshold, .. } if top_k == -3.0 && threshold == 150.0
        ));
    }

    #[test]
    fn catalogue_defaults_to_all() {
        let cli = Cli::try_parse_from(["product-matcher", "catalogue"]).unwrap();
        assert!(matches!(cli.command, Commands::Catalogue { category } if category == "All"));
    }
}
