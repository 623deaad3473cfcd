use abdash::{
    cli::{Cli, OutputFormat},
    config::AnalysisConfig,
    csv_output, dataset,
    html_output::HtmlOutput,
    json_output::JsonOutput,
    report::{self, AnalysisReport},
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = AnalysisConfig::resolve(&args)?;
    tracing::debug!(?config, "resolved configuration");

    let data = dataset::load_cached(&config.data_path)
        .with_context(|| format!("Failed to load {}", config.data_path.display()))?;

    let mut report = AnalysisReport::build(&data, config.alpha)?;
    if config.show_raw && matches!(config.format, OutputFormat::Text | OutputFormat::Html) {
        report = report.with_raw(&data);
    }

    let source = config.data_path.display().to_string();
    match config.format {
        OutputFormat::Text => print!("{}", report.to_text(args.inspect)),
        OutputFormat::Json => println!("{}", JsonOutput::new(&report, source).to_json()?),
        OutputFormat::Csv => {
            // Keep stdout machine-readable
            if args.inspect {
                eprint!("{}", report::format_overview(&report.overview));
            }
            print!("{}", csv_output::to_csv(&report)?);
        }
        OutputFormat::Html => print!("{}", HtmlOutput::new(&report, source).to_html()),
    }

    Ok(())
}
