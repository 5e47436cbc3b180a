//! Line-oriented session driving one query and the catalogue.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use matcher_engine::{CatalogueBrowser, PreviewRegistry, QueryExecutor};
use product_search_client::ProductApiClient;
use product_search_client::types::ImageFile;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` clears the selected file.
    File(Option<PathBuf>),
    Url(String),
    TopK(f64),
    Threshold(f64),
    Submit,
    Reset,
    Category(String),
    Related(String),
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// Numbers that do not parse become NaN, which the engine resets to the
/// default value.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "file" if rest.is_empty() => Command::File(None),
        "file" => Command::File(Some(PathBuf::from(rest))),
        // URL text is stored as entered; blank text clears the URL input.
        "url" => Command::Url(rest.to_string()),
        "top-k" => Command::TopK(number(rest)),
        "threshold" => Command::Threshold(number(rest)),
        "submit" => Command::Submit,
        "reset" => Command::Reset,
        "category" if rest.is_empty() => return Err("category needs a name".into()),
        "category" => Command::Category(rest.to_string()),
        "related" if rest.is_empty() => return Err("related needs a product id".into()),
        "related" => Command::Related(rest.to_string()),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(command))
}

fn number(text: &str) -> f64 {
    text.parse().unwrap_or(f64::NAN)
}

pub async fn run(client: ProductApiClient) -> Result<ExitCode, Box<dyn Error>> {
    let mut catalogue = CatalogueBrowser::new();
    if let Err(err) = catalogue.bootstrap(&client).await {
        render::banner(&err);
    }

    let mut query = QueryExecutor::new(client, PreviewRegistry::new());
    render::help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        render::prompt(query.state());
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                render::warning(&message);
                continue;
            }
        };

        match command {
            Command::File(None) => query.set_file(None),
            Command::File(Some(path)) => match ImageFile::from_path(&path).await {
                Ok(file) => query.set_file(Some(file)),
                Err(err) => render::warning(&err.to_string()),
            },
            Command::Url(text) => query.set_url(text),
            Command::TopK(raw) => query.set_top_k(raw),
            Command::Threshold(raw) => query.set_threshold_percent(raw),
            Command::Submit => {
                if let Err(err) = query.submit().await {
                    debug!(error = %err, "interactive submit failed");
                }
                render::query(query.state());
            }
            Command::Reset => {
                query.reset();
                render::query(query.state());
            }
            Command::Category(name) => {
                catalogue.select_category(name);
                render::catalogue(&catalogue);
            }
            Command::Related(id) => match catalogue.related(query.backend(), &id, None).await {
                Ok(products) => render::related(&id, &products),
                Err(err) => render::banner(&err),
            },
            Command::Show => {
                render::input(query.state());
                render::query(query.state());
            }
            Command::Help => render::help(),
            Command::Quit => break,
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
    }

    #[test]
    fn file_without_path_clears() {
        assert_eq!(parse_command("file"), Ok(Some(Command::File(None))));
        assert_eq!(
            parse_command("file  shots/red shoe.png "),
            Ok(Some(Command::File(Some(PathBuf::from("shots/red shoe.png")))))
        );
    }

    #[test]
    fn url_and_parameters() {
        assert_eq!(
            parse_command("url https://x/y.jpg"),
            Ok(Some(Command::Url("https://x/y.jpg".into())))
        );
        assert_eq!(parse_command("url"), Ok(Some(Command::Url(String::new()))));
        assert_eq!(parse_command("top-k 30"), Ok(Some(Command::TopK(30.0))));
        assert_eq!(
            parse_command("threshold 42.5"),
            Ok(Some(Command::Threshold(42.5)))
        );
    }

    #[test]
    fn unparsable_numbers_become_nan() {
        assert!(matches!(
            parse_command("top-k lots"),
            Ok(Some(Command::TopK(v))) if v.is_nan()
        ));
    }

    #[test]
    fn missing_arguments_and_unknown_words_are_errors() {
        assert!(parse_command("category").is_err());
        assert!(parse_command("related").is_err());
        assert!(parse_command("frobnicate").is_err());
        assert_eq!(
            parse_command("category Lamps"),
            Ok(Some(Command::Category("Lamps".into())))
        );
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    }
}
