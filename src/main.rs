// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Loggie CLI
//!
//! Fetches URLs through the recording client and prints the resulting log.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use loggie::{
    DetailsItem, DetailsKind, HttpClient, LogRecord, LogStore, Outcome, RecordingClient, Request,
    Snapshot, StoreEvent,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("loggie=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => match FetchOptions::parse(&args[2..]) {
            Ok(options) => fetch(options).await,
            Err(msg) => {
                eprintln!("{}", msg);
                eprintln!("Usage: loggie fetch <url>... [--details] [--failed] [--json] [--output <file>]");
                ExitCode::from(1)
            }
        },
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("loggie {}", loggie::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Loggie - In-process network traffic logger

USAGE:
    loggie <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>...  Fetch URLs and print the recorded exchanges
    help            Show this help message
    version         Show version information

FETCH OPTIONS:
    --details       Print overview, request and response details
    --failed        Only list failed exchanges
    --json          Print the log as JSON instead of a list
    --output <file> Also write the JSON log to a file

EXAMPLES:
    loggie fetch https://example.com
    loggie fetch https://example.com/api https://example.com/missing --details
    loggie fetch https://example.com --json --output log.json
"#
    );
}

#[derive(Debug, Default)]
struct FetchOptions {
    urls: Vec<String>,
    details: bool,
    failed_only: bool,
    json: bool,
    output: Option<PathBuf>,
}

impl FetchOptions {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--details" => options.details = true,
                "--failed" => options.failed_only = true,
                "--json" => options.json = true,
                "--output" | "-o" => {
                    let path = iter.next().ok_or("--output needs a file path")?;
                    options.output = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => return Err(format!("Unknown option: {}", flag)),
                url => options.urls.push(url.to_string()),
            }
        }

        if options.urls.is_empty() {
            return Err("No URL given".to_string());
        }
        Ok(options)
    }
}

async fn fetch(options: FetchOptions) -> ExitCode {
    match record_and_print(&options).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Returns whether every exchange succeeded
async fn record_and_print(options: &FetchOptions) -> anyhow::Result<bool> {
    let store = LogStore::with_defaults().context("Failed to start log store")?;
    let _progress = store.observe(|event| {
        if let StoreEvent::Appended { id, len } = event {
            tracing::debug!(id, len, "Exchange recorded");
        }
    });

    let client = RecordingClient::new(
        HttpClient::new().context("Failed to create HTTP client")?,
        &store,
    );

    let requests = options
        .urls
        .iter()
        .map(|url| Request::get(url).with_context(|| format!("Bad URL: {}", url)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    client.execute_all(requests).await;

    let snapshot = store.snapshot_async().await;
    let all_ok = snapshot.iter().all(|r| r.is_success());

    if options.json {
        println!("{}", snapshot.to_json_pretty()?);
    } else {
        print_log(&snapshot, options);
    }

    if let Some(ref path) = options.output {
        snapshot
            .write_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {} records to {}", snapshot.len(), path.display());
    }

    Ok(all_ok)
}

fn print_log(snapshot: &Snapshot, options: &FetchOptions) {
    let shown = if options.failed_only {
        snapshot.filtered(|r| r.outcome() == Outcome::Failure)
    } else {
        snapshot.filtered(|_| true)
    };

    println!("=== Log ({} of {} exchanges) ===", shown.len(), snapshot.len());

    for record in shown {
        println!("{}", summary_line(record));
        if options.details {
            print_details(record);
        }
    }
}

fn summary_line(record: &LogRecord) -> String {
    let mark = match record.outcome() {
        Outcome::Success => "✓",
        Outcome::Failure => "✗",
        Outcome::Pending => "?",
    };
    let status = record
        .status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "---".to_string());
    let time = record
        .duration_ms()
        .map(|ms| format!(" ({}ms)", ms))
        .unwrap_or_default();

    format!(
        "{} [{}] {} {}{}",
        mark,
        status,
        record.title(),
        record.host().unwrap_or_default(),
        time
    )
}

fn print_details(record: &LogRecord) {
    for kind in [DetailsKind::Overview, DetailsKind::Request, DetailsKind::Response] {
        println!("  --- {:?} ---", kind);
        for section in record.details(kind) {
            if let Some(ref header) = section.header {
                println!("  {}", header);
            }
            for item in &section.items {
                match item {
                    DetailsItem::Subtitle { title, subtitle } => {
                        println!("    {}: {}", title, subtitle)
                    }
                    DetailsItem::Raw(text) => {
                        for line in text.lines() {
                            println!("    {}", line);
                        }
                    }
                }
            }
            if let Some(ref footer) = section.footer {
                println!("    ({})", footer);
            }
        }
    }
}
