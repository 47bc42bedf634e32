use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use anyhow::{anyhow, Result};

use semdict_backend::dir_list::{has_extension, list_files_with_extension};
use semdict_backend::logger;
use semdict_backend::pipeline::{run_build, run_load, PipelineConfig};
use semdict_backend::types::Dictionary;
use semdict_backend::DEFAULT_CORPUS_NAME;

#[derive(Parser, Debug)]
#[command(author, version, about = "Semantic dictionary transform and load", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level: silent, error, warn, info, debug
    #[arg(long, global = true, value_name = "LEVEL", env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build normalized per-language documents from the source data sets
    #[command(arg_required_else_help = true)]
    Build {
        /// Dictionary to build: sdbh (Hebrew) or sdbg (Greek)
        #[arg(long, env = "SEMDICT_DICTIONARY")]
        dictionary: Dictionary,

        /// Data version written to the output documents
        #[arg(long = "data-version", env = "SEMDICT_VERSION")]
        data_version: String,

        /// Directory with lexicon (*.xml) and cross-reference (*.json) documents. Can be repeated.
        #[arg(long = "input", value_name = "DIRECTORY_PATH", required = true, env = "SEMDICT_INPUT", value_delimiter = ',')]
        input_dirs: Vec<PathBuf>,

        /// Directory for the normalized documents
        #[arg(long, value_name = "DIRECTORY_PATH", env = "SEMDICT_OUTPUT")]
        output: PathBuf,

        /// Directory with domain-definition documents
        #[arg(long, value_name = "DIRECTORY_PATH", env = "SEMDICT_DOMAINS")]
        domains: Option<PathBuf>,

        /// SQLite database to load the documents into
        #[arg(long, value_name = "FILE_PATH", env = "SEMDICT_DATABASE")]
        database: Option<PathBuf>,

        /// Schema applied to the database before loading
        #[arg(long, value_name = "FILE_PATH", env = "SEMDICT_SCHEMA", requires = "database")]
        schema: Option<PathBuf>,

        /// Corpus name of the occurrence groups
        #[arg(long, env = "SEMDICT_CORPUS", default_value = DEFAULT_CORPUS_NAME)]
        corpus: String,

        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Load normalized documents into a database
    #[command(arg_required_else_help = true)]
    Load {
        #[arg(long, value_name = "FILE_PATH", env = "SEMDICT_DATABASE")]
        database: PathBuf,

        #[arg(long, value_name = "FILE_PATH", env = "SEMDICT_SCHEMA")]
        schema: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        verbose: bool,

        /// Normalized XML documents, or directories containing them
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },
}

fn expand_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) = paths.into_iter().partition(|p| p.is_dir());

    let mut result: Vec<PathBuf> = files.into_iter().filter(|p| has_extension(p, "xml")).collect();
    result.extend(list_files_with_extension(&dirs, "xml"));
    result
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            dictionary,
            data_version,
            input_dirs,
            output,
            domains,
            database,
            schema,
            corpus,
            verbose,
        } => {
            let mut config = PipelineConfig::new(dictionary, &data_version, input_dirs, output);
            config.domains_dir = domains;
            config.database = database;
            config.schema_path = schema;
            config.corpus_name = corpus;
            config.verbose = verbose;

            let report = run_build(&config)?;

            if !report.failed_languages.is_empty() {
                return Err(anyhow!("Validation failed for languages: {}", report.failed_languages.join(", ")));
            }
            if let Some(load) = &report.load {
                if load.documents_failed > 0 {
                    return Err(anyhow!("{} documents failed to load", load.documents_failed));
                }
            }
            Ok(())
        }

        Commands::Load { database, schema, verbose, paths } => {
            let files = expand_paths(paths);
            if files.is_empty() {
                return Err(anyhow!("No XML documents to load"));
            }

            let stats = run_load(&database, schema.as_deref(), &files, verbose)?;
            if stats.documents_failed > 0 {
                return Err(anyhow!("{} documents failed to load", stats.documents_failed));
            }
            Ok(())
        }
    }
}

fn main() {
    // May define SEMDICT_* values, picked up by clap through `env = ...`
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Unknown log level: {}", level);
            exit(1);
        }
    }

    if let Err(e) = run(cli.command) {
        logger::error(&format!("{:#}", e));
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
