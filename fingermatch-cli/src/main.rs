use clap::Parser;
use fingermatch::{Candidate, IdentifyConfig, Identifier, MinutiaeSet, TemplateDatabase};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "FingerMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct IdentifyConfigJson {
    k: usize,
    th_range: f64,
    th_angle: f64,
    acceptance_floor: Option<f64>,
    parallel: bool,
}

impl Default for IdentifyConfigJson {
    fn default() -> Self {
        let cfg = IdentifyConfig::default();
        Self {
            k: cfg.k,
            th_range: cfg.th_range,
            th_angle: cfg.th_angle,
            acceptance_floor: cfg.acceptance_floor,
            parallel: cfg.parallel,
        }
    }
}

impl From<IdentifyConfigJson> for IdentifyConfig {
    fn from(value: IdentifyConfigJson) -> Self {
        Self {
            k: value.k,
            th_range: value.th_range,
            th_angle: value.th_angle,
            acceptance_floor: value.acceptance_floor,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    database_path: String,
    query_path: String,
    output_path: Option<String>,
    topk: usize,
    enroll_label: Option<String>,
    identify: IdentifyConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            query_path: String::new(),
            output_path: None,
            topk: 5,
            enroll_label: None,
            identify: IdentifyConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateRecord {
    label: String,
    score: f64,
    common_points: usize,
}

impl From<Candidate> for CandidateRecord {
    fn from(value: Candidate) -> Self {
        Self {
            label: value.label,
            score: value.score,
            common_points: value.common_points,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<CandidateRecord>,
    ranking: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize)]
struct EnrollOutput {
    enrolled: String,
    replaced: bool,
    templates: usize,
}

fn load_minutiae(path: &str) -> Result<MinutiaeSet, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn load_or_create_database(path: &str) -> Result<TemplateDatabase, Box<dyn std::error::Error>> {
    if Path::new(path).exists() {
        Ok(TemplateDatabase::load_json(path)?)
    } else {
        tracing::info!(path, "creating new template database");
        Ok(TemplateDatabase::new())
    }
}

fn emit(json: String, output_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("fingermatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.database_path.is_empty() || config.query_path.is_empty() {
        return Err("database_path and query_path must be set in the config".into());
    }
    if config.topk == 0 {
        return Err("topk must be at least 1".into());
    }
    let identify_cfg: IdentifyConfig = config.identify.into();
    identify_cfg.validate()?;

    let query = load_minutiae(&config.query_path)?;

    if let Some(label) = config.enroll_label {
        let mut database = load_or_create_database(&config.database_path)?;
        let replaced = database.enroll(label.as_str(), &query, identify_cfg.k).is_some();
        database.save_json(&config.database_path)?;
        tracing::info!(label = label.as_str(), replaced, "enrolled");
        let output = EnrollOutput {
            enrolled: label,
            replaced,
            templates: database.len(),
        };
        return emit(serde_json::to_string_pretty(&output)?, config.output_path);
    }

    let database = TemplateDatabase::load_json(&config.database_path)?;
    let identifier = Identifier::new(database).with_config(identify_cfg)?;
    let ranked = identifier.rank(&query);
    let best = ranked
        .first()
        .filter(|top| identifier.accepts(top.score))
        .cloned()
        .map(CandidateRecord::from);
    let ranking = ranked
        .into_iter()
        .take(config.topk)
        .map(CandidateRecord::from)
        .collect();
    let output = Output { best, ranking };
    emit(serde_json::to_string_pretty(&output)?, config.output_path)
}
