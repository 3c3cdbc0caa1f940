#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use proxylink::cli::{Args, parse_lines, render};
use tracing::Level;

fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let content = read_input(args)?;
    let list = parse_lines(&content, args.strict)?;
    let rendered = render(&list, args.format)?;

    match args.output.as_deref() {
        Some(output) => {
            let path = Path::new(output);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {parent:?}"))?;
            }
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write proxies to {path:?}"))?;
            tracing::info!("Proxies written to {:?}", path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn read_input(args: &Args) -> anyhow::Result<String> {
    let mut content = args.links.join("\n");
    if let Some(input) = args.input.as_deref() {
        tracing::info!("Reading share links from: {}", input);
        let file = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read share links from {input}"))?;
        content.push('\n');
        content.push_str(&file);
    }
    if args.links.is_empty() && args.input.is_none() {
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read share links from stdin")?;
    }
    Ok(content)
}
