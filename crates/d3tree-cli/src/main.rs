use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use d3tree::{Aggregation, Input, JsonSource, NormalizeOptions, Size, Snippet};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Parser, Debug)]
#[command(
    name = "d3tree-cli",
    about = "Turn JSON or treemap aggregations into d3tree widget payloads",
    version
)]
struct Args {
    /// Input is a treemap result container (`{"tm": [...], ...}`)
    #[arg(long, conflicts_with = "nested")]
    treemap: bool,

    /// Input is already hierarchical; pass it through without re-encoding
    #[arg(long)]
    nested: bool,

    /// Label of the root node for treemap input
    #[arg(long)]
    rootname: Option<String>,

    /// Field holding the cell label
    #[arg(long, default_value = "name")]
    celltext: String,

    /// Field holding the node identifier
    #[arg(long, default_value = "id")]
    id: String,

    /// Field holding the node size
    #[arg(long, default_value = "size")]
    value_field: String,

    /// JavaScript function run when a node is clicked
    #[arg(long)]
    click_action: Option<String>,

    /// Emit widget HTML instead of payload JSON
    #[arg(long)]
    html: bool,

    /// Widget width (pixels or CSS size, HTML output only)
    #[arg(long)]
    width: Option<String>,

    /// Widget height (pixels or CSS size, HTML output only)
    #[arg(long)]
    height: Option<String>,

    /// Container element id (HTML output only)
    #[arg(long)]
    element_id: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Input file or http(s) URL (defaults to stdin)
    input: Option<String>,
}

fn init_logging(level: LogLevel) {
    let level = match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn source(input: Option<&str>) -> Result<JsonSource> {
    Ok(match input {
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
            JsonSource::Url(s.to_string())
        }
        Some(path) => JsonSource::Path(PathBuf::from(path)),
        None => {
            let mut buf = String::new();
            stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            JsonSource::Text(buf)
        }
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let source = source(args.input.as_deref())?;
    let input = if args.treemap {
        let serde_json::Value::Object(container) = source.parse()? else {
            anyhow::bail!("treemap input must be a JSON object");
        };
        Input::Aggregation(Aggregation::from_container(container)?)
    } else if args.nested {
        Input::from_value(source.parse()?)?
    } else {
        Input::Json(source)
    };

    let options = NormalizeOptions {
        rootname: args.rootname,
        celltext: args.celltext,
        id: args.id,
        value_field: args.value_field,
        click_action: args.click_action.map(Snippet::from),
    };

    if args.html {
        let widget = d3tree::d3tree(
            input,
            &options,
            args.width.map(Size::from),
            args.height.map(Size::from),
            args.element_id,
        )?;
        println!("{}", widget.to_html()?);
    } else {
        let payload = d3tree::normalize(input, &options)?;
        if args.pretty {
            println!("{}", payload.to_json_string_pretty()?);
        } else {
            println!("{}", payload.to_json_string()?);
        }
    }

    Ok(())
}
