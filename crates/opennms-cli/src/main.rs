//! OpenNMS command-line client
//!
//! Thin wrapper around `opennms-client`: reads the server configuration from
//! flags or `OPENNMS_*` environment variables and prints results as JSON.
//!
//! ```bash
//! onms info
//! onms node 210 --recurse
//! onms nodes --limit 20 --filter label=router
//! onms feedback 616
//! ```

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use opennms_client::{AuthConfig, Filter, Node, OnmsClient, ServerConfig};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "onms")]
#[command(version)]
#[command(about = "Query an OpenNMS server over its REST API")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OpenNMS base URL
    #[arg(long, env = "OPENNMS_URL", default_value = opennms_client::config::DEFAULT_URL, global = true)]
    url: String,

    /// Basic-auth user name
    #[arg(long, short, env = "OPENNMS_USERNAME", global = true)]
    username: Option<String>,

    /// Basic-auth password
    #[arg(long, short, env = "OPENNMS_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "OPENNMS_TIMEOUT_MS", default_value_t = 10_000, global = true)]
    timeout_ms: u64,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show server version information
    Info,

    /// Show one node
    Node {
        /// Node ID
        id: u64,

        /// Also load SNMP interfaces, IP interfaces and services
        #[arg(long, short)]
        recurse: bool,
    },

    /// List nodes
    Nodes {
        /// Maximum number of nodes to return
        #[arg(long, short)]
        limit: Option<u32>,

        /// Extra query parameter, as key=value (repeatable)
        #[arg(long, short, value_parser = parse_key_value)]
        filter: Vec<(String, String)>,
    },

    /// Show correlation feedback for a situation
    Feedback {
        /// Situation ID
        situation_id: u64,
    },

    /// List feedback tags starting with a prefix
    Tags {
        #[arg(default_value = "")]
        prefix: String,
    },
}

/// One line of `onms nodes` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeRow<'a> {
    id: u64,
    label: Option<&'a str>,
    location: Option<&'a str>,
    foreign_source: Option<&'a str>,
    foreign_id: Option<&'a str>,
}

impl<'a> From<&'a Node> for NodeRow<'a> {
    fn from(node: &'a Node) -> Self {
        Self {
            id: node.id(),
            label: node.label.as_deref(),
            location: node.location.as_deref(),
            foreign_source: node.foreign_source.as_deref(),
            foreign_id: node.foreign_id.as_deref(),
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

impl Cli {
    fn server_config(&self) -> Result<ServerConfig> {
        let mut builder = ServerConfig::builder(&self.url)
            .timeout(Duration::from_millis(self.timeout_ms));
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                builder = builder.auth(AuthConfig::new(username, password));
            }
            (None, None) => {}
            _ => return Err(anyhow!("--username and --password must be given together")),
        }
        builder.build().context("Invalid server configuration")
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = OnmsClient::new(cli.server_config()?);
    debug!("Using OpenNMS at {}", client.base_url());

    match cli.command {
        Command::Info => {
            let info = client
                .server_metadata()
                .await
                .context("Failed to get server metadata")?;
            print_json(&info)
        }
        Command::Node { id, recurse } => {
            let node = client
                .nodes()
                .get(id, recurse)
                .await
                .with_context(|| format!("Failed to get node {id}"))?;
            print_json(&*node)
        }
        Command::Nodes { limit, filter } => {
            let mut query = Filter::new();
            for (key, value) in filter {
                query = query.param(key, value);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            let nodes = client
                .nodes()
                .find(Some(&query))
                .await
                .context("Failed to list nodes")?;
            info!("Found {} nodes", nodes.len());
            let rows: Vec<NodeRow<'_>> = nodes.iter().map(NodeRow::from).collect();
            print_json(&rows)
        }
        Command::Feedback { situation_id } => {
            let dao = client.situation_feedback();
            let feedback = dao
                .get_feedback(situation_id)
                .await
                .with_context(|| format!("Failed to get feedback for situation {situation_id}"))?;
            print_json(&dao.serialize_feedback(&feedback))
        }
        Command::Tags { prefix } => {
            let tags = client
                .situation_feedback()
                .get_tags(&prefix)
                .await
                .context("Failed to get feedback tags")?;
            print_json(&tags)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}
