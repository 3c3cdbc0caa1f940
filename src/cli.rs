use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use crate::config::{ProxyConfig, ProxyList};
use crate::parser::parse_uri;

#[derive(Parser)]
#[command(version, about = "Convert proxy share links into mihomo proxy entries", long_about = None)]
pub struct Args {
    #[arg(help = "Share links to convert; reads stdin when neither links nor --input are given")]
    pub links: Vec<String>,

    #[arg(short, long, help = "File with one share link per line")]
    pub input: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml, help = "Output format")]
    pub format: OutputFormat,

    #[arg(short, long, help = "Output path, stdout when omitted")]
    pub output: Option<String>,

    #[arg(long, help = "Abort on the first link that fails to parse")]
    pub strict: bool,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// mihomo `proxies:` document
    Yaml,
    Json,
}

/// Parses every link in `content`, one per line.
///
/// Blank lines and `#` comments are skipped. A failing link is logged and
/// skipped, or aborts the whole batch when `strict` is set.
pub fn parse_lines(content: &str, strict: bool) -> Result<ProxyList> {
    let mut proxies: Vec<ProxyConfig> = Vec::new();
    let mut failed = 0usize;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_uri(line) {
            Ok(proxy) => {
                debug!("Line {}: parsed '{}'", index + 1, proxy.name());
                proxies.push(proxy);
            }
            Err(e) if strict => {
                bail!("Line {}: {}", index + 1, e);
            }
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                failed += 1;
            }
        }
    }

    info!("Parsed {} proxies ({} skipped)", proxies.len(), failed);
    Ok(ProxyList { proxies })
}

/// Serializes the parsed proxies in the requested format.
pub fn render(list: &ProxyList, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(list).context("Failed to serialize proxies to YAML")
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(list)
                .context("Failed to serialize proxies to JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}
