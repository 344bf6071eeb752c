//! Write the OpenAPI document as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use attendance::ApiDoc;
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the attendance API OpenAPI document",
    version
)]
struct CliArgs {
    /// Write to this file instead of standard output.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
    /// Indent the JSON.
    #[arg(long)]
    pretty: bool,
}

fn render(pretty: bool) -> Result<String> {
    let doc = ApiDoc::openapi();
    let json = if pretty {
        doc.to_pretty_json()
    } else {
        doc.to_json()
    };
    json.wrap_err("failed to serialise OpenAPI document")
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let json = render(args.pretty)?;

    match args.output {
        Some(path) => fs::write(&path, json)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").wrap_err("failed to write to stdout")?;
        }
    }
    Ok(())
}
