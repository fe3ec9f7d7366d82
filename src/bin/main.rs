//! panesearch CLI - drive the side-by-side search workspace from a terminal
//!
//! `panes` prints the URL each pane would load, `engines` lists the
//! supported engines and `proxy` runs the iframe proxy for Baidu and
//! DuckDuckGo.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use panesearch::{
    layout::Direction,
    proxy::{self, ProxyConfig},
    utils::query,
    workspace::{Workspace, DEFAULT_PAGE_URL},
    EngineName,
};
use url::Url;

#[derive(Parser)]
#[command(name = "panesearch")]
#[command(about = "Side-by-side multi-engine search workspace")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a workspace and print the URL of every pane
    Panes {
        /// Shared query submitted to every engine
        query: Option<String>,

        /// Page address the workspace is loaded from
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        page: String,

        /// Split direction (overrides the page's `dir`)
        #[arg(short, long, value_enum)]
        dir: Option<DirCli>,

        /// Engines to add after the two defaults
        #[arg(short, long, value_enum)]
        engine: Vec<EngineCli>,

        /// Parameter override for every pane of an engine, as ENGINE:KEY=VALUE
        #[arg(short, long)]
        param: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List supported engines and their query rules
    Engines,
    /// Run the iframe proxy for Baidu and DuckDuckGo
    Proxy {
        /// Port to listen on
        #[arg(long, default_value_t = proxy::DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EngineCli {
    Bing,
    Google,
    Baidu,
    Duckduckgo,
}

impl From<EngineCli> for EngineName {
    fn from(engine: EngineCli) -> Self {
        match engine {
            EngineCli::Bing => EngineName::Bing,
            EngineCli::Google => EngineName::Google,
            EngineCli::Baidu => EngineName::Baidu,
            EngineCli::Duckduckgo => EngineName::DuckDuckGo,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirCli {
    V,
    H,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Simple,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Proxy { .. } => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Panes {
            query,
            page,
            dir,
            engine,
            param,
            format,
        } => handle_panes(query, page, dir, engine, param, format)?,
        Commands::Engines => handle_list_engines(),
        Commands::Proxy { port } => {
            proxy::run_proxy(ProxyConfig::new().with_port(port)).await?;
        }
    }

    Ok(())
}

fn handle_panes(
    shared_query: Option<String>,
    page: String,
    dir: Option<DirCli>,
    engines: Vec<EngineCli>,
    params: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut page = Url::parse(&page).with_context(|| format!("Invalid page address '{page}'"))?;
    if let Some(dir) = dir {
        let dir = match dir {
            DirCli::V => Direction::Vertical,
            DirCli::H => Direction::Horizontal,
        };
        query::set_param(&mut page, "dir", dir.as_param());
    }

    let overrides = params
        .iter()
        .map(|p| parse_param(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut workspace = Workspace::from_page_url(page)?;

    for engine in engines {
        if let Err(e) = workspace.add_engine(engine.into()) {
            match e.notice() {
                Some(notice) => eprintln!(
                    "{} {}",
                    notice.title.yellow().bold(),
                    notice.description.dimmed()
                ),
                None => return Err(e.into()),
            }
        }
    }

    if let Some(text) = shared_query {
        workspace.submit_query(&text);
    }

    if !overrides.is_empty() {
        apply_overrides(&mut workspace, &overrides);
    }

    display_panes(&workspace, &format);
    Ok(())
}

/// Parse `ENGINE:KEY=VALUE`
fn parse_param(raw: &str) -> anyhow::Result<(EngineName, String, String)> {
    let (engine, pair) = raw
        .split_once(':')
        .with_context(|| format!("Expected ENGINE:KEY=VALUE, got '{raw}'"))?;
    let (key, value) = pair
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE after ':', got '{pair}'"))?;
    if key.is_empty() {
        anyhow::bail!("Expected ENGINE:KEY=VALUE with a non-empty KEY, got '{raw}'");
    }

    Ok((engine.parse()?, key.to_string(), value.to_string()))
}

/// Enter overrides through the settings panel, then submit it
fn apply_overrides(workspace: &mut Workspace, overrides: &[(EngineName, String, String)]) {
    let targets: Vec<_> = workspace.engines().map(|e| (e.key, e.name)).collect();
    workspace.open_settings();

    for (name, key, value) in overrides {
        for (engine_key, _) in targets.iter().filter(|(_, n)| n == name) {
            let settings = workspace.settings_mut();
            if let Some(row) = settings.add_row(*engine_key) {
                settings.set_name(*engine_key, row, key);
                settings.set_value(*engine_key, row, value);
            }
        }
    }

    workspace.submit_settings();
}

fn handle_list_engines() {
    println!("{}", "Supported Search Engines:".bold().blue());
    println!();

    for name in EngineName::ALL {
        let template = name.template();
        let route = if template.is_proxied() {
            "via proxy".yellow()
        } else {
            "direct".green()
        };
        println!(
            "{} - query parameter '{}', {} ({})",
            name.as_str().bold(),
            template.query_param,
            template.base,
            route
        );
    }

    println!();
    println!(
        "Proxied engines need `panesearch proxy` running on port {}.",
        proxy::DEFAULT_PORT
    );
}

fn display_panes(workspace: &Workspace, format: &OutputFormat) {
    match format {
        OutputFormat::Json => {
            let panes: Vec<_> = workspace
                .engines()
                .map(|e| {
                    serde_json::json!({
                        "key": e.key,
                        "name": e.name,
                        "url": e.url.as_str(),
                        "collapsed": workspace.layout().is_collapsed(e.panel),
                    })
                })
                .collect();
            let output = serde_json::json!({
                "page": workspace.page_url().as_str(),
                "direction": workspace.layout().direction.to_string(),
                "panes": panes,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("Failed to render JSON: {e}"),
            }
        }
        OutputFormat::Simple => {
            for engine in workspace.engines() {
                println!("{}", engine.url);
            }
        }
        OutputFormat::Table => {
            println!(
                "{} {}",
                "Panes".bold().blue(),
                format!("({} split)", workspace.layout().direction).dimmed()
            );
            println!("{}", "─".repeat(80).dimmed());

            for (i, engine) in workspace.engines().enumerate() {
                println!(
                    "{}. {} {}",
                    (i + 1).to_string().bold(),
                    engine.name.as_str().bold(),
                    format!("[key {}]", engine.key).dimmed()
                );
                println!("   🔗 {}", engine.url.as_str().blue().underline());
            }

            println!();
            println!("{} {}", "Page:".bold(), workspace.page_url().as_str().cyan());
        }
    }
}
