use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use matcalc_classifiers::config::{DistanceMetric, ModelType};
use matcalc_cli::classifiers::classify::{run_classification, ClassifyParams};
use matcalc_cli::classifiers::create::{run_create, CreateParams};
use matcalc_cli::classifiers::train::{load_train_config, run_training, TrainConfig, TrainParams};
use matcalc_cli::util::validate_matrix_file;

fn matrix_arg() -> Arg {
    Arg::new("matrix")
        .help("Path to the feature matrix (*.tsv, *.txt or *.csv); rows are features, columns are samples")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn annotation_columns_arg() -> Arg {
    Arg::new("annotation_columns")
        .long("annotation-columns")
        .help("Number of leading label columns in the matrix file")
        .value_parser(clap::value_parser!(usize))
}

fn output_arg(help: &'static str) -> Arg {
    Arg::new("output_file")
        .short('o')
        .long("output")
        .help(help)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn name_arg(help: &'static str) -> Arg {
    Arg::new("name")
        .short('n')
        .long("name")
        .help(help)
        .required(true)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

fn groups_arg() -> Arg {
    Arg::new("groups")
        .short('g')
        .long("groups")
        .help("Path to the JSON sample group file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MATCALC_LOG", "error,matcalc=info"))
        .init();

    let matches = Command::new("matcalc")
        .version(clap::crate_version!())
        .about("MatCalc classifiers - phenotype/control classifiers for expression matrices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("classifiers")
                .about("Create, train and apply classifiers")
                .subcommand_required(true)
                .subcommand(
                    Command::new("create")
                        .about("Extract phenotype and control submatrices into a classifier XML document")
                        .arg(matrix_arg())
                        .arg(groups_arg())
                        .arg(name_arg("Name of the classifier"))
                        .arg(
                            Arg::new("phenotype")
                                .short('p')
                                .long("phenotype")
                                .help("Name of the phenotype group")
                                .required(true),
                        )
                        .arg(
                            Arg::new("control")
                                .short('c')
                                .long("control")
                                .help("Name of the control group")
                                .required(true),
                        )
                        .arg(
                            Arg::new("annotation")
                                .short('a')
                                .long("annotation")
                                .help("Row annotation holding feature names. Defaults to the first label column."),
                        )
                        .arg(annotation_columns_arg())
                        .arg(output_arg("Path of the XML document to write. Defaults to stdout.")),
                )
                .subcommand(
                    Command::new("train")
                        .about("Train a model on all sample groups and export it as XML")
                        .arg(matrix_arg())
                        .arg(groups_arg())
                        .arg(name_arg("Name of the trained model"))
                        .arg(
                            Arg::new("config")
                                .long("config")
                                .help("Path to training JSON configuration file")
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("model_type")
                                .long("model-type")
                                .help("Override the model type from the JSON config.")
                                .value_parser(["group-centroid"])
                                .value_hint(ValueHint::Other),
                        )
                        .arg(
                            Arg::new("metric")
                                .long("metric")
                                .help("Distance metric for centroid models.")
                                .value_parser(["euclidean", "manhattan"])
                                .value_hint(ValueHint::Other),
                        )
                        .arg(annotation_columns_arg())
                        .arg(output_arg("Path of the models XML document. Defaults to stdout.")),
                )
                .subcommand(
                    Command::new("classify")
                        .about("Classify every sample of a matrix with a stored model")
                        .arg(matrix_arg())
                        .arg(
                            Arg::new("models")
                                .short('m')
                                .long("models")
                                .help("Path to a models XML document written by `train`")
                                .required(true)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(name_arg("Name of the model to apply"))
                        .arg(annotation_columns_arg())
                        .arg(output_arg("Path to write the results (*.tsv or *.csv). Defaults to stdout.")),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("classifiers", sub_m)) => handle_classifiers(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_classifiers(matches: &ArgMatches) -> Result<()> {
    let outcome = match matches.subcommand() {
        Some(("create", m)) => handle_create(m),
        Some(("train", m)) => handle_train(m),
        Some(("classify", m)) => handle_classify(m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = &outcome {
        log::error!("[MatCalc::Classifiers] {:#}", e);
    }
    outcome
}

fn required_path(matches: &ArgMatches, id: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_else(|| unreachable!("{} is a required argument", id))
}

fn required_string(matches: &ArgMatches, id: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| unreachable!("{} is a required argument", id))
}

fn handle_create(matches: &ArgMatches) -> Result<()> {
    let matrix = required_path(matches, "matrix");
    validate_matrix_file(&matrix)?;
    log::info!("[MatCalc::Classifiers] Creating classifier from {:?}", matrix);

    let params = CreateParams {
        matrix,
        groups: required_path(matches, "groups"),
        name: required_string(matches, "name"),
        phenotype: required_string(matches, "phenotype"),
        control: required_string(matches, "control"),
        annotation: matches.get_one::<String>("annotation").cloned(),
        annotation_columns: matches.get_one::<usize>("annotation_columns").copied().unwrap_or(1),
        output: matches.get_one::<PathBuf>("output_file").cloned(),
    };

    let classifier = run_create(&params)?;
    eprintln!(
        "[MatCalc::Classifiers] Created classifier '{}' with {} features.",
        classifier.name(),
        classifier.feature_count()
    );
    Ok(())
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let matrix = required_path(matches, "matrix");
    validate_matrix_file(&matrix)?;

    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        eprintln!("[MatCalc::Classifiers] Using config: {:?}", config_path);
        load_train_config(config_path)?
    } else {
        eprintln!("[MatCalc::Classifiers] No config provided; using defaults.");
        TrainConfig::default()
    };

    if let Some(model_type) = matches.get_one::<String>("model_type") {
        config.model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
    }

    if let Some(metric) = matches.get_one::<String>("metric") {
        let metric = DistanceMetric::from_str(metric).map_err(anyhow::Error::msg)?;
        match &mut config.model.model_type {
            ModelType::GroupCentroid { metric: m } => *m = metric,
        }
    }

    if let Some(columns) = matches.get_one::<usize>("annotation_columns") {
        config.annotation_columns = *columns;
    }

    if matches.get_one::<PathBuf>("config").is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[MatCalc::Classifiers] Default config:\n{}", default_json);
    }

    let params = TrainParams {
        matrix,
        groups: required_path(matches, "groups"),
        name: required_string(matches, "name"),
        output: matches.get_one::<PathBuf>("output_file").cloned(),
    };

    let registry = run_training(&params, &config)?;
    eprintln!(
        "[MatCalc::Classifiers] Trained {} model(s): {}",
        registry.len(),
        registry.names().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let matrix = required_path(matches, "matrix");
    validate_matrix_file(&matrix)?;

    let params = ClassifyParams {
        matrix,
        models: required_path(matches, "models"),
        name: required_string(matches, "name"),
        annotation_columns: matches.get_one::<usize>("annotation_columns").copied().unwrap_or(1),
        output: matches.get_one::<PathBuf>("output_file").cloned(),
    };

    let result = run_classification(&params)?;
    eprintln!(
        "[MatCalc::Classifiers] Completed classification of {} samples.",
        result.len()
    );
    Ok(())
}
