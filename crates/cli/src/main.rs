mod config;
mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jsreport::{JsReportClient, PayloadBuilder, ReportBackend, ReportRequest, ServiceConfig};
use mcp::ReportServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "jsreport-mcp.toml";
const DEFAULT_LOG_FILTER: &str = "jsreport_mcp=info,mcp=info,jsreport=info";

#[derive(Parser)]
#[command(name = "jsreport-mcp")]
#[command(about = "MCP server for generating PDF reports with JSReport", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ./jsreport-mcp.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP tool server on stdio
    Serve,
    /// List the templates available on the JSReport server
    Templates,
    /// Render a report request (JSON file) to a PDF
    Render {
        /// Report request as JSON
        #[arg(short, long)]
        request: PathBuf,
        /// Where to write the PDF
        #[arg(short, long, default_value = "report.pdf")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries the MCP stdio transport.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    let client = JsReportClient::new(&settings)?;
    info!(service = %client, template = %settings.default_template, "configured");

    match cli.command {
        Some(Commands::Serve) | None => cmd_serve(client, &settings).await,
        Some(Commands::Templates) => cmd_templates(&client).await,
        Some(Commands::Render { request, output }) => {
            cmd_render(&client, &settings, &request, &output).await
        }
    }
}

async fn cmd_serve(client: JsReportClient, settings: &ServiceConfig) -> Result<()> {
    let builder = PayloadBuilder::new(&settings.default_template);
    ReportServer::new(client, builder).serve_stdio().await?;
    Ok(())
}

async fn cmd_templates(client: &JsReportClient) -> Result<()> {
    let templates = client.list_templates().await?;

    if templates.is_empty() {
        println!("No templates found.");
        return Ok(());
    }

    println!("{:<32}  {:<12}  {:<12}  SHORTID", "NAME", "ENGINE", "RECIPE");
    println!("{}", "-".repeat(72));

    for t in templates {
        println!(
            "{:<32}  {:<12}  {:<12}  {}",
            t.name,
            t.engine.as_deref().unwrap_or("-"),
            t.recipe.as_deref().unwrap_or("-"),
            t.shortid.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

async fn cmd_render(
    client: &JsReportClient,
    settings: &ServiceConfig,
    request_path: &Path,
    output: &Path,
) -> Result<()> {
    let content = std::fs::read_to_string(request_path)?;
    let request: ReportRequest =
        serde_json::from_str(&content).map_err(|e| Error::InvalidRequest {
            path: request_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let report = PayloadBuilder::new(&settings.default_template).build(request)?;
    let pdf = client
        .render(&report.template_name, &report.payload)
        .await?;

    std::fs::write(output, &pdf.bytes)?;
    println!(
        "Wrote {} ({} bytes, template {})",
        output.display(),
        pdf.size(),
        report.template_name
    );
    Ok(())
}

/// File settings (if any) overlaid with `JSREPORT_*` environment variables.
fn load_settings(path: Option<&Path>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) if !path.exists() => {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Some(path) => Config::load(path)?,
        None if Path::new(CONFIG_FILE).exists() => Config::load(CONFIG_FILE)?,
        None => Config::default(),
    };

    let vars: HashMap<String, String> = std::env::vars()
        .filter(|(k, _)| k.starts_with("JSREPORT_"))
        .collect();
    config.apply_env(&vars)?;

    Ok(config.service_config()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_this_binary() {
        let target = env!("CARGO_CRATE_NAME");
        assert!(
            DEFAULT_LOG_FILTER
                .split(',')
                .any(|directive| directive == format!("{target}=info")),
            "{DEFAULT_LOG_FILTER} does not enable {target}"
        );
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
