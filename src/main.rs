use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use toolview::data::records_from_csv;
use toolview::model::ChartSpec;
use toolview::runtime::{render_chart, render_tool_call};
use toolview::showcase::{noun_for, parse_tool_selection, showcase_items, Timeline};
use toolview::tools::{tool_names, DispatchOptions, ToolCall};
use toolview::{OutputFormat, RenderOptions, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "toolview")]
#[command(about = "Render AI tool-call payloads (charts, products, images, statuses)", long_about = None)]
struct Args {
    /// Canvas width in pixels
    #[arg(long, global = true, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, global = true, default_value_t = 600)]
    height: u32,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Color theme
    #[arg(long, global = true, value_enum, default_value_t = ThemeMode::Light)]
    theme: ThemeMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart spec (JSON) read from FILE or stdin
    Chart {
        file: Option<PathBuf>,

        /// CSV file whose rows replace the spec's data
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Render a tool-call envelope (JSON) read from FILE or stdin
    Tool {
        file: Option<PathBuf>,

        /// Show an error status for calls in the `error` state
        #[arg(long)]
        surface_errors: bool,
    },
    /// List registered tools
    Tools,
    /// Render the built-in demo items into a directory
    Showcase {
        /// Comma-separated tool names
        #[arg(long)]
        tools: Option<String>,

        /// Point of the reveal timeline in milliseconds (default: finished)
        #[arg(long)]
        at: Option<u64>,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = RenderOptions {
        width: args.width,
        height: args.height,
        format: args.format,
        theme: args.theme,
    };

    match args.command {
        Command::Chart { file, data } => {
            let input = read_input(file.as_deref())?;
            let mut spec: ChartSpec =
                serde_json::from_str(&input).context("Failed to parse chart spec JSON")?;

            if let Some(path) = data {
                let csv = File::open(&path)
                    .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
                spec.data = records_from_csv(csv).context("Failed to read CSV data")?;
            }

            let bytes = render_chart(&spec, &options).context("Failed to render chart")?;
            write_stdout(&bytes)
        }
        Command::Tool {
            file,
            surface_errors,
        } => {
            let input = read_input(file.as_deref())?;
            let call: ToolCall =
                serde_json::from_str(&input).context("Failed to parse tool call JSON")?;
            let dispatch_options = DispatchOptions {
                surface_tool_errors: surface_errors,
            };

            match render_tool_call(&call, &dispatch_options, &options)
                .context("Failed to render tool call")?
            {
                Some(bytes) => write_stdout(&bytes),
                None => Ok(()),
            }
        }
        Command::Tools => {
            let listing: String = tool_names().map(|name| format!("{name}\n")).collect();
            write_stdout(listing.as_bytes())
        }
        Command::Showcase { tools, at, out } => {
            run_showcase(tools.as_deref(), at, &out, &options)
        }
    }
}

fn run_showcase(
    tools: Option<&str>,
    at: Option<u64>,
    out: &Path,
    options: &RenderOptions,
) -> Result<()> {
    let selection = parse_tool_selection(tools);
    if selection.is_empty() {
        let available: Vec<&str> = tool_names().collect();
        anyhow::bail!(
            "No known tools selected. Available tools: {}",
            available.join(", ")
        );
    }

    let items = showcase_items(&selection)?;
    let timeline = Timeline::new(items.len(), noun_for(&selection));
    let frame = match at {
        Some(ms) => timeline.frame_at(ms),
        None => timeline.final_frame(),
    };

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let mut report = format!("{}\n", frame.banner);
    for shown in &frame.items {
        let item = &items[shown.index];
        let call = item.call_at(shown.loading);
        let Some(bytes) = render_tool_call(&call, &DispatchOptions::default(), options)
            .with_context(|| format!("Failed to render showcase item {}", item.name))?
        else {
            continue;
        };

        let path = out.join(format!(
            "{:02}-{}.{}",
            shown.index + 1,
            item.slug(),
            options.format.extension()
        ));
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), loading = shown.loading, "wrote showcase item");
        report.push_str(&format!("{}\n", path.display()));
    }

    write_stdout(report.as_bytes())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read from stdin")?;
            Ok(input)
        }
    }
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(bytes)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
