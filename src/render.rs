//! Terminal rendering of engine state.

use std::io::{self, Write};

use colored::Colorize;
use matcher_engine::catalogue::ALL_CATEGORIES;
use matcher_engine::params::{clamp_threshold_percent, clamp_top_k};
use matcher_engine::presenter::{
    CatalogueRow, EMPTY_CATEGORY, NO_RESULTS_HINT, ResultCard, query_label, related_hint,
    results_hint,
};
use matcher_engine::{CatalogueBrowser, InputMode, QueryError, QueryState, QueryStatus};
use product_search_client::types::Product;

pub fn banner(err: &QueryError) {
    eprintln!("{} {}", "!".red().bold(), err.user_message().red());
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

pub fn query(state: &QueryState) {
    match state.status() {
        QueryStatus::Idle => println!("{}", NO_RESULTS_HINT.dimmed()),
        QueryStatus::Submitting => println!("{}", "Searching...".yellow()),
        QueryStatus::Error => {
            if let Some(message) = state.error_message() {
                println!("{} {}", "error:".red().bold(), message);
            }
        }
        QueryStatus::Success => results(state.query_id(), state.results()),
    }
}

pub fn results(query_id: Option<&str>, products: &[Product]) {
    match query_id {
        Some(id) => println!("{}  {}", "Results".bold(), query_label(id).cyan()),
        None => println!("{}", "Results".bold()),
    }
    println!("{}", results_hint(products.len()).dimmed());

    for (rank, product) in products.iter().enumerate() {
        card(rank + 1, &ResultCard::from_product(product));
    }
}

/// Related products as cards, without a query header.
pub fn related(product_id: &str, products: &[Product]) {
    println!("{} {}", "Related to".bold(), product_id.bold());
    if let Some(hint) = related_hint(products.len()) {
        println!("  {}", hint.dimmed());
    }
    for (rank, product) in products.iter().enumerate() {
        card(rank + 1, &ResultCard::from_product(product));
    }
}

fn card(rank: usize, card: &ResultCard) {
    let score = card
        .similarity
        .as_deref()
        .map(|s| format!("  {}", s.green()))
        .unwrap_or_default();
    println!("{rank:>3}. {}{}  {}", card.name.bold(), score, card.id.dimmed());
    println!(
        "     {} | {} | {}",
        card.brand,
        card.category,
        card.price.yellow()
    );
    println!("     {}", card.description.dimmed());
    println!("     image: {}", card.image);
    if let Some(original) = &card.original_image {
        println!("     original: {}", original.underline());
    }
}

pub fn catalogue(browser: &CatalogueBrowser) {
    println!(
        "{} {}",
        "Catalogue".bold(),
        format!("({})", browser.selected()).dimmed()
    );

    let visible = browser.filtered();
    if visible.is_empty() {
        println!("  {}", EMPTY_CATEGORY.dimmed());
        return;
    }
    for product in visible {
        let row = CatalogueRow::from_product(product);
        let thumbnail = match &row.thumbnail {
            Ok(src) => src.normal(),
            Err(text) => text.dimmed(),
        };
        println!(
            "  {:<12} {} [{}] {}",
            row.id,
            row.name.bold(),
            row.category,
            thumbnail
        );
    }
}

pub fn categories(browser: &CatalogueBrowser) {
    for category in browser.categories() {
        if category == browser.selected() {
            println!("{} {}", "*".green(), category.bold());
        } else if category == ALL_CATEGORIES {
            println!("  {}", category.dimmed());
        } else {
            println!("  {category}");
        }
    }
}

/// Current input and parameters of the interactive query.
pub fn input(state: &QueryState) {
    let source = match state.input_mode() {
        InputMode::File => state
            .input()
            .file()
            .map(|f| format!("file {} ({}, {} bytes)", f.name, f.mime, f.bytes.len()))
            .unwrap_or_default(),
        InputMode::Url => format!("url {}", state.input().image_url().trim()),
        InputMode::None => "none".dimmed().to_string(),
    };
    println!("{} {}", "input:".bold(), source);
    if let Some(preview) = state.preview() {
        println!("{} {}", "preview:".bold(), preview.url());
    }
    println!(
        "{} top-k {} | threshold {}%",
        "params:".bold(),
        clamp_top_k(state.top_k()),
        clamp_threshold_percent(state.threshold_percent())
    );
}

pub fn prompt(state: &QueryState) {
    let marker = match state.status() {
        QueryStatus::Idle => "matcher".normal(),
        QueryStatus::Submitting => "matcher".yellow(),
        QueryStatus::Success => "matcher".green(),
        QueryStatus::Error => "matcher".red(),
    };
    print!("{marker}> ");
    // Prompt display is best effort.
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("{}", "Commands".bold());
    for (usage, what) in [
        ("file [PATH]", "select an image file; no path clears it"),
        ("url <URL>", "use a remote image URL"),
        ("top-k <N>", "number of matches, 1 to 24"),
        ("threshold <PCT>", "minimum similarity, 0 to 100"),
        ("submit", "run the search"),
        ("reset", "clear input and results"),
        ("category <NAME>", "filter the catalogue"),
        ("related <ID>", "products related to ID"),
        ("show", "current input and results"),
        ("help", "this list"),
        ("quit", "leave the session"),
    ] {
        println!("  {} {}", format!("{usage:<18}").cyan(), what);
    }
}
