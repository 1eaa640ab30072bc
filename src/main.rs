use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};

use tfreview::config::Config;
use tfreview::output;
use tfreview::plan::{ChangeKind, PlanSummary, serialize};
use tfreview::render::{HtmlRenderer, PlanRenderer, TextRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Json,
    Text,
}

#[derive(Parser)]
#[command(name = "tfreview")]
#[command(about = "Review terraform plan output as a summary, JSON document or HTML page", long_about = None)]
#[command(version)]
struct Cli {
    /// Plan text file, or `-` to read from stdin
    #[arg(default_value = "-")]
    input: String,

    /// HTML report path
    #[arg(short, long, default_value = "plan_review.html")]
    output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Print the parsed plan as JSON (same as --format json)
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to .tfreview.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Custom handlebars template for the HTML report
    #[arg(long)]
    template: Option<PathBuf>,

    /// Keep data source reads in the report
    #[arg(long)]
    include_data_sources: bool,

    /// Show attribute values flagged sensitive
    #[arg(long)]
    show_sensitive: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not echo plan text read from stdin
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn format(&self) -> Format {
        if self.json { Format::Json } else { self.format }
    }

    /// Apply command line flags on top of the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if self.include_data_sources {
            config.parser.include_data_sources = true;
        }
        if self.show_sensitive {
            config.render.show_sensitive = true;
        }
        if let Some(template) = &self.template {
            config.render.template = Some(template.clone());
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Read plan text from stdin, echoing each line as terraform would print it
fn read_stdin(echo: bool) -> Result<String> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut text = String::new();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read plan from stdin")?;
        if echo {
            writeln!(stdout, "{}", line)?;
        }
        text.push_str(&line);
        text.push('\n');
    }

    stdout.flush()?;
    Ok(text)
}

fn read_input(input: &str, echo: bool) -> Result<String> {
    if input == "-" {
        return read_stdin(echo);
    }

    fs::read_to_string(input).with_context(|| format!("Failed to read plan file: {}", input))
}

fn print_counts(plan: &PlanSummary) {
    output::section("Plan Summary");
    if plan.has_changes {
        output::change_count(ChangeKind::Create, "to add", plan.to_add);
        output::change_count(ChangeKind::Update, "to change", plan.to_change);
        output::change_count(ChangeKind::Replace, "to replace", plan.to_replace);
        output::change_count(ChangeKind::Delete, "to destroy", plan.to_destroy);
    } else {
        output::dimmed("  No changes.");
    }
}

fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create report directory")?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write report: {}", path.display()))
}

fn run(cli: &Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    cli.apply_to(&mut config);

    let text = read_input(&cli.input, !cli.quiet)?;
    if text.trim().is_empty() {
        output::error("No plan found");
        return Ok(1);
    }

    let plan = config.parser().parse(&text);
    debug!(
        "Parsed {} resource changes and {} output changes",
        plan.resource_changes.len(),
        plan.output_changes.len()
    );

    for warning in &plan.warnings {
        output::diagnostic(warning);
    }

    let format = cli.format();

    if format == Format::Json {
        println!("{}", serialize::to_json(&plan, true)?);
    }

    if plan.has_errors {
        for error in &plan.errors {
            output::diagnostic(error);
        }
        return Ok(1);
    }

    match format {
        Format::Json => {}
        Format::Text => {
            let report = TextRenderer::new().render(&plan, &config.render)?;
            print!("{}", report);
        }
        Format::Html => {
            let renderer: Box<dyn PlanRenderer> = Box::new(HtmlRenderer::new()?);
            let html = renderer.render(&plan, &config.render)?;
            write_report(&cli.output, &html)?;

            print_counts(&plan);
            info!("Report written to {}", cli.output.display());
            output::success(&format!("Plan review written to {}", cli.output.display()));
        }
    }

    Ok(0)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            output::error(&format!("{:#}", e));
            process::exit(1);
        }
    }
}
