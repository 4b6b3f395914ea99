use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rodo_assess::assessment::domain::Assessment;
use rodo_assess::assessment::{compliance, navigation, progress, template};
use rodo_assess::error::AppError;
use rodo_assess::server::{self, ServeOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "rodo-assess",
    about = "Run the RODO compliance assessment service or summarize an assessment from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Summarize an exported assessment JSON file
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Assessment JSON file, as produced by the export endpoint
    #[arg(long)]
    file: Option<PathBuf>,
    /// Include a per-area breakdown in the output
    #[arg(long)]
    list_areas: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => {
            server::run(ServeOverrides {
                host: args.host,
                port: args.port,
            })
            .await
        }
        Command::Report(args) => run_report(args),
    }
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let mut assessment = match args.file {
        Some(path) => {
            let raw = std::fs::read(path)?;
            serde_json::from_slice::<Assessment>(&raw)?
        }
        None => template::standard_template(),
    };
    progress::refresh(&mut assessment);

    render_report(&assessment, args.list_areas);
    Ok(())
}

fn render_report(assessment: &Assessment, list_areas: bool) {
    let name = if assessment.name.is_empty() {
        "(bez nazwy)"
    } else {
        assessment.name.as_str()
    };
    println!("Ocena RODO: {name}");
    println!("Status: {}", assessment.status.label());
    println!(
        "Postęp: {}% ({} obszarów)",
        assessment.progress,
        navigation::total_areas(&assessment.chapters)
    );
    println!(
        "Poziom zgodności: {}%",
        compliance::overall_compliance(&assessment.chapters)
    );

    let tally = compliance::ScoreTally::collect(&assessment.chapters);
    println!(
        "Oceny obszarów: {} pozytywnych, {} z zastrzeżeniami, {} negatywnych",
        tally.positive, tally.warning, tally.negative
    );

    println!("\nZgodność w rozdziałach");
    for chapter in &assessment.chapters {
        println!(
            "- {}: {}%",
            chapter.name,
            compliance::chapter_score(chapter)
        );
    }

    if list_areas {
        println!("\nObszary");
        for chapter in &assessment.chapters {
            for area in &chapter.areas {
                let score = compliance::area_compliance(area)
                    .map(|value| format!("{value}%"))
                    .unwrap_or_else(|| "brak odpowiedzi".to_string());
                let judgement = area
                    .score
                    .map(|value| value.label())
                    .unwrap_or("bez oceny");
                println!(
                    "- {} | {} | zgodność {} | ocena {}",
                    chapter.name, area.name, score, judgement
                );
            }
        }
    }
}
