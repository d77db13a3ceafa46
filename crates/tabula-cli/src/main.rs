use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use tabula_classifiers::validation::PREDICT;
use tabula_classifiers::VersionId;
use tabula_cli::commands::{self, ConfigOverrides};
use tabula_cli::util::dataset_path;

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to a JSON pipeline configuration file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("TABULA_LOG", "error,tabula=info"))
        .init();

    let matches = Command::new("tabula")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Tabula CLI - train, validate and serve a tabular binary classifier")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Split a dataset, fit a logistic model, report AUC and save a versioned artifact")
                .arg(
                    Arg::new("dataset")
                        .help("Path to the training data (*.csv or *.tsv)")
                        .required(true)
                        .value_parser(dataset_path)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("version_id")
                        .help("Model version to create, e.g. v1")
                        .required(true)
                        .value_parser(clap::value_parser!(VersionId))
                        .value_hint(ValueHint::Other),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("artifact_root")
                        .short('o')
                        .long("artifact-root")
                        .help(
                            "Directory model artifacts are written to. \
                             Overrides the directory specified in the configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .help("Seed for the train/validation split")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("validation_fraction")
                        .short('f')
                        .long("validation-fraction")
                        .help("Share of rows held out for validation, strictly between 0 and 1")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a JSON record against a named schema and print the coerced record")
                .arg(
                    Arg::new("record")
                        .help("The record as inline JSON")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("schema")
                        .long("schema")
                        .help("Schema name to validate against")
                        .default_value(PREDICT)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Score a JSON record with a trained model artifact")
                .arg(
                    Arg::new("model")
                        .help("Path to a model artifact (model_<version>.bin)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("record")
                        .help("The record as inline JSON")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(config_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("validate", sub_m)) => handle_validate(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> Result<&'a T> {
    matches
        .get_one::<T>(id)
        .with_context(|| format!("missing required argument <{}>", id))
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let dataset: &PathBuf = required(matches, "dataset")?;
    let version_id: &VersionId = required(matches, "version_id")?;

    let mut config = commands::load_config(matches.get_one::<PathBuf>("config").map(|p| p.as_path()))?;
    ConfigOverrides {
        artifact_root: matches.get_one::<PathBuf>("artifact_root").cloned(),
        seed: matches.get_one::<u64>("seed").copied(),
        validation_fraction: matches.get_one::<f64>("validation_fraction").copied(),
    }
    .apply(&mut config);

    match commands::run_train(&config, dataset, version_id) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_validate(matches: &ArgMatches) -> Result<()> {
    let record: &String = required(matches, "record")?;
    let schema: &String = required(matches, "schema")?;

    match commands::run_validate(schema, record) {
        Ok(validated) => {
            println!("{}", serde_json::to_string(&validated)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Validation failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let model: &PathBuf = required(matches, "model")?;
    let record: &String = required(matches, "record")?;
    let config = commands::load_config(matches.get_one::<PathBuf>("config").map(|p| p.as_path()))?;

    match commands::run_predict(&config, model, record) {
        Ok(prediction) => {
            println!("{}", serde_json::to_string(&prediction)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
