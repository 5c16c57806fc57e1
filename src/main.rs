use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::debug;

use lead_bro::leads::{self, LeadInput};
use lead_bro::scoring::{LeadScore, ScoringConfig};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable summary (breakdown for a single lead, ranked table for several)
    Text,
    /// Pretty-printed JSON
    Json,
    /// Tab-separated values for scripting
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score leads from JSON/YAML files (or stdin when no file is given)
    Score {
        /// Lead files; each holds one lead or a list of leads
        files: Vec<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Fill in the contact form interactively with a live score
    Wizard,
    /// Check the scoring config and report every problem
    Validate,
    /// Write the default scoring config
    Init {
        /// Where to write it (defaults to ~/.config/lead-bro/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "lead-bro")]
#[command(about = "Contact-form lead scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-bro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadReport<'a> {
    source: &'a str,
    lead_score: &'a LeadScore,
}

fn main() {
    let cli = Cli::parse();
    lead_bro::logging::init_cli_logger(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    let code = match cli.command {
        Commands::Init { path, force } => run_init(path, force),
        Commands::Score { files, format } => {
            load_scoring(config_path).map_or(EXIT_CONFIG, |scoring| run_score(&files, format, &scoring))
        }
        Commands::Wizard => load_scoring(config_path).map_or(EXIT_CONFIG, run_wizard),
        Commands::Validate => load_scoring(config_path).map_or(EXIT_CONFIG, |_| {
            println!("Scoring config is valid.");
            EXIT_SUCCESS
        }),
    };

    std::process::exit(code);
}

/// Load the config and validate its scoring section, printing every problem.
fn load_scoring(config_path: Option<PathBuf>) -> Option<ScoringConfig> {
    let config = match lead_bro::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return None;
        }
    };

    let scoring = config.effective_scoring();
    if let Err(errors) = lead_bro::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return None;
    }
    Some(scoring)
}

fn run_init(path: Option<PathBuf>, force: bool) -> i32 {
    match lead_bro::config::init::write_default_config(path, force) {
        Ok(written) => {
            println!("Config written to {}", written.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}

fn run_score(files: &[PathBuf], format: OutputFormat, scoring: &ScoringConfig) -> i32 {
    let mut inputs: Vec<LeadInput> = Vec::new();

    if files.is_empty() {
        let stdin = std::io::stdin();
        match leads::read_leads(stdin.lock(), "stdin") {
            Ok(found) => inputs.extend(found),
            Err(e) => {
                eprintln!("Input error: {:#}", e);
                return EXIT_INPUT;
            }
        }
    } else {
        for file in files {
            match leads::load_leads(file) {
                Ok(found) => {
                    debug!(file = %file.display(), leads = found.len(), "loaded leads");
                    inputs.extend(found);
                }
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    return EXIT_INPUT;
                }
            }
        }
    }

    let ranked = leads::score_and_rank(inputs, scoring);
    let use_colors = lead_bro::output::should_use_colors();

    match format {
        OutputFormat::Text => {
            if ranked.len() == 1 {
                println!("{}", lead_bro::output::format_breakdown(&ranked[0].result, use_colors));
            } else {
                println!("{}", lead_bro::output::format_ranked_table(&ranked, use_colors));
            }
        }
        OutputFormat::Json => {
            let reports: Vec<LeadReport> = ranked
                .iter()
                .map(|lead| LeadReport {
                    source: &lead.source,
                    lead_score: &lead.result.score,
                })
                .collect();
            match lead_bro::output::format_json(&reports) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    return EXIT_INPUT;
                }
            }
        }
        OutputFormat::Tsv => {
            let tsv = lead_bro::output::format_tsv(&ranked);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
    }

    EXIT_SUCCESS
}

fn run_wizard(scoring: ScoringConfig) -> i32 {
    let mut state = lead_bro::ContactFormState::new(scoring);
    let use_colors = lead_bro::output::should_use_colors();

    let stdin = std::io::stdin();
    let mut prompter =
        lead_bro::wizard::Prompter::new(BufReader::new(stdin.lock()), std::io::stderr());

    match lead_bro::wizard::run_wizard(&mut state, &mut prompter, use_colors) {
        Ok(Some(submission)) => match lead_bro::output::format_json(&submission) {
            Ok(json) => {
                println!("{}", json);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Output error: {:#}", e);
                EXIT_INPUT
            }
        },
        Ok(None) => {
            eprintln!("Form not submitted.");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Wizard error: {:#}", e);
            EXIT_INPUT
        }
    }
}
