use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info, Level};

use hepbands::bands;
use hepbands::formatting::{Identity, Terminal};
use hepbands::language::{BandSet, Dataset, Mode};
use hepbands::parsing;
use hepbands::reference;
use hepbands::templating::{self, Dat, Json, Table, Template};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("hepbands")
        .version(VERSION)
        .propagate_version(true)
        .about("Cumulative uncertainty bands from HepData cross-section tables.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress to standard error. Repeat for more detail."),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Only log errors."),
        )
        .subcommand(
            Command::new("check")
                .about("Validate the given HepData file and summarize the variables in it")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The HepData file containing the cross-section tables."),
                ),
        )
        .subcommand(
            Command::new("bands")
                .about("Compute cumulative fractional uncertainty bands for every variable")
                .arg(
                    Arg::new("corr")
                        .long("corr")
                        .action(ArgAction::SetTrue)
                        .help("Show the most significant correlated sources individually instead of the fixed luminosity / correction factor / signal extraction / statistics stack."),
                )
                .arg(
                    Arg::new("sm")
                        .long("sm")
                        .value_name("FILE")
                        .help("Divide by the reference cross sections in FILE instead of the measured ones. Each line of FILE is a variable name followed by one value per bin."),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["table", "json", "dat"])
                        .default_value("table")
                        .help("Output format."),
                )
                .arg(
                    Arg::new("burst")
                        .long("burst")
                        .action(ArgAction::SetTrue)
                        .help("Write each variable to its own file rather than one document."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Directory to write output files into. Without this (and without --burst) output goes to standard output."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for colour even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The HepData file containing the cross-section tables."),
                ),
        )
        .get_matches();

    initialize_logging(&matches);

    match matches.subcommand() {
        Some(("check", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                check(Path::new(filename));
            }
        }
        Some(("bands", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                draw(Path::new(filename), submatches);
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: hepbands [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn initialize_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        Level::ERROR
    } else {
        match matches.get_count("verbose") {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load and parse, reporting any problem and exiting if there is one.
fn ingest(filename: &Path) -> Dataset {
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    info!("Parsing {}", filename.display());

    match parsing::parse(&content) {
        Ok(parsed) => {
            for warning in &parsed.warnings {
                eprintln!("{}", problem::concise_warning(warning, filename));
            }
            parsed.dataset
        }
        Err(error) => {
            eprintln!(
                "{}",
                problem::full_parsing_error(&error, filename, &content)
            );
            std::process::exit(1);
        }
    }
}

fn fail(filename: &Path, problem: &str) -> ! {
    eprintln!("{}", problem::concise_error(filename, problem));
    std::process::exit(1);
}

fn check(filename: &Path) {
    let dataset = ingest(filename);

    for variable in dataset.iter() {
        let mut sources: Vec<&str> = variable
            .bins
            .iter()
            .flat_map(|bin| {
                bin.sources
                    .keys()
                    .map(|name| name.as_str())
            })
            .collect();
        sources.sort();
        sources.dedup();

        println!(
            "{}: {} bin{}, {} uncertainty source{}",
            variable.name,
            variable
                .bins
                .len(),
            if variable.bins.len() == 1 { "" } else { "s" },
            sources.len(),
            if sources.len() == 1 { "" } else { "s" }
        );
    }
}

fn draw(filename: &Path, submatches: &ArgMatches) {
    let mut dataset = ingest(filename);

    if let Some(table) = submatches.get_one::<String>("sm") {
        let table = Path::new(table);
        let content = match parsing::load(table) {
            Ok(content) => content,
            Err(error) => {
                eprintln!("{}", problem::concise_loading_error(&error));
                std::process::exit(1);
            }
        };

        dataset = reference::parse(&content)
            .and_then(|values| reference::apply(&dataset, &values))
            .unwrap_or_else(|error| fail(table, &error.message()));
    }

    let corr = submatches.get_flag("corr");
    let mode = if corr { Mode::Correlated } else { Mode::Plain };
    debug!("Mode {:?}", mode);

    let sets = bands::aggregate_dataset(&dataset, mode)
        .unwrap_or_else(|error| fail(filename, &error.message()));

    let burst = submatches.get_flag("burst");
    let output = submatches
        .get_one::<String>("output")
        .map(PathBuf::from);

    let to_terminal = !burst && output.is_none() && std::io::stdout().is_terminal();

    let template: Box<dyn Template> = match submatches
        .get_one::<String>("format")
        .map(|format| format.as_str())
    {
        Some("json") => Box::new(Json),
        Some("dat") => Box::new(Dat),
        _ => {
            if submatches.get_flag("raw-control-chars") || to_terminal {
                Box::new(Table(Terminal))
            } else {
                Box::new(Table(Identity))
            }
        }
    };

    if burst {
        let directory = output.unwrap_or_else(|| PathBuf::from("."));
        for set in &sets {
            let target = output_filename(&directory, &set.name, corr, template.extension());
            write(template.as_ref(), std::slice::from_ref(set), &target);
        }
    } else if let Some(directory) = output {
        let target = output_filename(&directory, "uncert", corr, template.extension());
        write(template.as_ref(), &sets, &target);
    } else {
        let result = templating::fill(template.as_ref(), &sets)
            .unwrap_or_else(|error| fail(filename, &error.to_string()));
        print!("{}", result);
    }
}

fn write(template: &dyn Template, sets: &[BandSet], target: &Path) {
    let result = templating::fill(template, sets)
        .unwrap_or_else(|error| fail(target, &error.to_string()));

    info!("Writing {}", target.display());

    if let Err(error) = std::fs::write(target, result) {
        fail(target, &error.to_string());
    }
}

/// <directory>/<stem>[_corr].<extension>
fn output_filename(directory: &Path, stem: &str, corr: bool, extension: &str) -> PathBuf {
    let name = format!(
        "{}{}.{}",
        stem,
        if corr { "_corr" } else { "" },
        extension
    );
    directory.join(name)
}
