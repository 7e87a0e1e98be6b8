/*
** This file is a part of xmlgold (golden-file checks for XML processing)
** Copyright (C) 2025 Gurer Ozen
**
** xmlgold is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xmlgold::GoldenComparator;
use xmlgold::GoldenError;
use xmlgold::HtmlError;
use xmlgold::HtmlOptions;
use xmlgold::ParseError;
use xmlgold::TextResource;
use xmlgold::record_attribute;
use xmlgold::to_html_file;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Golden-file checks for XML parsing and HTML serialization.
#[derive(Debug, Parser)]
#[command(name = "xmlgold", version, about)]
struct Cli {
    /// Directory holding the input documents and golden files
    #[arg(long, env = "TEST_SRC", default_value = ".", global = true)]
    test_src: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare an output file with a golden file line by line
    Diff {
        golden: PathBuf,
        output: PathBuf,
        /// Encoding of both files
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,
    },
    /// Write an XML document as HTML and compare it with a golden file
    Html {
        input: PathBuf,
        golden: PathBuf,
        /// HTML output file (default: <GOLDEN stem>out.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "utf-8")]
        output_encoding: String,
        /// Start the output with <!DOCTYPE html>
        #[arg(long)]
        doctype: bool,
    },
    /// Record an attribute of every element and compare with a golden file
    Attrs {
        input: PathBuf,
        golden: PathBuf,
        /// Qualified name of the recorded attribute
        #[arg(long, default_value = "attr")]
        attr: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Golden(#[from] GoldenError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn default_output(golden: &Path) -> PathBuf {
    let mut name = golden.file_stem().unwrap_or_default().to_os_string();
    name.push("out.html");
    PathBuf::from(name)
}

fn run(cli: Cli) -> Result<bool, CliError> {
    let test_src = cli.test_src;
    match cli.command {
        Command::Diff {
            golden,
            output,
            encoding,
        } => {
            let golden = TextResource::with_label(test_src.join(golden), &encoding)?;
            let output = TextResource::with_label(output, &encoding)?;
            Ok(GoldenComparator::new().compare(&golden, &output)?)
        }
        Command::Html {
            input,
            golden,
            output,
            output_encoding,
            doctype,
        } => {
            let options = HtmlOptions {
                doctype,
                ..HtmlOptions::with_label(&output_encoding)?
            };
            let output = output.unwrap_or_else(|| default_output(&golden));
            to_html_file(test_src.join(input), &output, &options)?;
            info!(output = %output.display(), "HTML written");
            Ok(GoldenComparator::new().compare(
                &TextResource::new(test_src.join(golden)),
                &TextResource::with_encoding(output, options.encoding),
            )?)
        }
        Command::Attrs {
            input,
            golden,
            attr,
        } => {
            let lines = record_attribute(test_src.join(input), &attr)?;
            Ok(GoldenComparator::new()
                .compare_lines(&TextResource::new(test_src.join(golden)), &lines)?)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("xmlgold: {}", err);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_output_name() {
        assert_eq!(
            default_output(Path::new("data/SurrogateTest1.html")),
            PathBuf::from("SurrogateTest1out.html")
        );
    }

    #[test]
    fn parse_arguments() {
        let cli = Cli::parse_from([
            "xmlgold",
            "html",
            "in.xml",
            "gold.html",
            "--output-encoding",
            "us-ascii",
            "--test-src",
            "data",
        ]);
        assert_eq!(cli.test_src, PathBuf::from("data"));
        assert!(matches!(
            cli.command,
            Command::Html { output: None, ref output_encoding, doctype: false, .. }
                if output_encoding == "us-ascii"
        ));
    }
}
