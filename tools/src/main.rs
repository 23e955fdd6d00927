//! muling-viewer: terminal front end for the money-muling analysis backend.
//!
//! Usage:
//!   muling-viewer --file transactions.csv [--endpoint URL] [--out-dir DIR] [--top 10]
//!   muling-viewer --report muling_analysis_report.json
//!   muling-viewer --check [--endpoint URL]
//!   muling-viewer --config viewer.json --file transactions.csv

use anyhow::Result;
use muling_core::{
    config::ViewerConfig,
    graph,
    session::{Resolution, SessionState},
    view, AnalysisReport, HttpAnalysisClient, SessionController, UploadFile,
};
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match string_arg(&args, "--config") {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(endpoint) = string_arg(&args, "--endpoint") {
        config.endpoint = endpoint.to_string();
    }
    config.top_k = parse_arg(&args, "--top", config.top_k);
    config.validate()?;

    if let Some(path) = string_arg(&args, "--report") {
        let bytes = std::fs::read(path)?;
        let report = AnalysisReport::from_json(&bytes)?;
        print_report(&report, config.top_k);
        return Ok(());
    }

    let client = HttpAnalysisClient::with_timeout(&config.endpoint, config.request_timeout())?;

    if args.iter().any(|a| a == "--check") {
        let health = client.health().await?;
        println!("backend: {} ({})", health.status, health.engine);
        return Ok(());
    }

    let file = match string_arg(&args, "--file") {
        Some(path) => Some(UploadFile::from_path(path)?),
        None => None,
    };

    println!("Money-muling analysis viewer");
    println!("  endpoint:  {}", config.endpoint);
    println!();

    let controller = SessionController::new(client);
    match controller.submit(file).await {
        None => {
            println!("No file selected. Pass --file <transactions.csv>.");
            return Ok(());
        }
        Some(Resolution::Stale) => {
            log::warn!("response superseded before it could be applied");
        }
        Some(_) => {}
    }

    match controller.state().await {
        SessionState::Loaded(loaded) => {
            print_report(loaded.report(), config.top_k);
            if let Some(dir) = string_arg(&args, "--out-dir") {
                let artifact = controller.export_as(&config.export_filename).await?;
                let path = artifact.write_to_dir(dir)?;
                println!();
                println!("Exported report to {}", path.display());
            }
        }
        SessionState::Failed { message, .. } => {
            eprintln!("{message}");
            std::process::exit(1);
        }
        other => log::warn!("session ended in unexpected state: {}", other.name()),
    }
    Ok(())
}

fn print_report(report: &AnalysisReport, top_k: usize) {
    println!("=== SUMMARY ===");
    for card in view::summary_cards(report) {
        println!("  {:<20} {}", card.label, card.value);
    }

    let graph = graph::build(report);
    println!();
    println!("=== GRAPH ===");
    println!("  nodes:           {}", graph.nodes().len());
    println!("  edges:           {}", graph.edges().len());
    println!("  normal endpoints {}", graph.dangling_endpoints().len());

    println!();
    println!("=== TOP SUSPICIOUS ACCOUNTS ===");
    let ranked = view::ranked_list(report, top_k);
    if ranked.is_empty() {
        println!("  (none flagged)");
    }
    for row in ranked {
        println!(
            "  {:>3}. {:<16} score {:>6} | {}",
            row.rank,
            row.account_id,
            row.score,
            row.patterns.join(", ")
        );
    }

    println!();
    println!("=== FRAUD RING SUMMARY ===");
    let rows = view::ring_table(report);
    if rows.is_empty() {
        println!("  (no rings detected)");
    }
    for row in rows {
        println!(
            "  {:<18} {:<16} members {:>3} | risk {:>5} | {}",
            row.ring_id, row.pattern_type, row.member_count, row.risk_score, row.members
        );
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
