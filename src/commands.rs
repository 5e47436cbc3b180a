use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use matcher_engine::{CatalogueBrowser, PreviewRegistry, QueryExecutor};
use product_search_client::ProductApiClient;
use product_search_client::config::default_config::{config_from_env, config_with_base};
use product_search_client::types::ImageFile;
use tracing::info;

use crate::cli::Commands;
use crate::{interactive, render};

/// `--api-url` wins over `PRODUCT_API_URL`.
pub fn build_client(api_url: Option<String>) -> product_search_client::Result<ProductApiClient> {
    let cfg = match api_url {
        Some(url) => config_with_base(url)?,
        None => config_from_env()?,
    };
    ProductApiClient::new(cfg)
}

pub async fn run(command: Commands, client: ProductApiClient) -> Result<ExitCode, Box<dyn Error>> {
    info!(base = client.base_url(), "product matcher starting");

    match command {
        Commands::Search {
            file,
            url,
            top_k,
            threshold,
        } => search(client, file, url, top_k, threshold).await,
        Commands::Catalogue { category } => catalogue(&client, category).await,
        Commands::Categories => categories(&client).await,
        Commands::Related { product_id, limit } => related(&client, &product_id, limit).await,
        Commands::Interactive => interactive::run(client).await,
    }
}

async fn search(
    client: ProductApiClient,
    file: Option<PathBuf>,
    url: Option<String>,
    top_k: f64,
    threshold: f64,
) -> Result<ExitCode, Box<dyn Error>> {
    let mut query = QueryExecutor::new(client, PreviewRegistry::new());
    if let Some(path) = file {
        query.set_file(Some(ImageFile::from_path(&path).await?));
    } else if let Some(url) = url {
        query.set_url(url);
    }
    query.set_top_k(top_k);
    query.set_threshold_percent(threshold);

    let outcome = query.submit().await;
    render::query(query.state());
    Ok(exit_code(outcome.is_ok()))
}

async fn catalogue(client: &ProductApiClient, category: String) -> Result<ExitCode, Box<dyn Error>> {
    let mut browser = CatalogueBrowser::new();
    if let Err(err) = browser.bootstrap(client).await {
        render::banner(&err);
        return Ok(ExitCode::FAILURE);
    }
    browser.select_category(category);
    render::catalogue(&browser);
    Ok(ExitCode::SUCCESS)
}

async fn categories(client: &ProductApiClient) -> Result<ExitCode, Box<dyn Error>> {
    let mut browser = CatalogueBrowser::new();
    if let Err(err) = browser.bootstrap(client).await {
        render::banner(&err);
        return Ok(ExitCode::FAILURE);
    }
    render::categories(&browser);
    Ok(ExitCode::SUCCESS)
}

async fn related(
    client: &ProductApiClient,
    product_id: &str,
    limit: Option<u32>,
) -> Result<ExitCode, Box<dyn Error>> {
    let browser = CatalogueBrowser::new();
    match browser.related(client, product_id, limit).await {
        Ok(products) => {
            render::related(product_id, &products);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            render::banner(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
