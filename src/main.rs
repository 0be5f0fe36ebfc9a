use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};

use mat2json::config::ConvertConfig;
use mat2json::convert::{convert_all, convert_and_report};

fn cli() -> Command {
    Command::new("mat2json")
        .version(clap::crate_version!())
        .about("Convert MATLAB .mat files holding g and H matrices to JSON for the web app")
        .arg(
            Arg::new("file")
                .help("Convert only this .mat file. Without it, every .mat file in the input directory is converted.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("input_dir")
                .short('i')
                .long("input-dir")
                .help("Directory scanned for .mat files in batch mode")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Directory receiving <name>.json files (created if absent)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
}

fn config_from(matches: &ArgMatches) -> ConvertConfig {
    let mut config = ConvertConfig::default();
    if let Some(dir) = matches.get_one::<PathBuf>("input_dir") {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
    config
}

fn main() -> Result<()> {
    mat2json::logging::init();

    let matches = cli().get_matches();
    let config = config_from(&matches);

    // Per-file failures are reported but never change the exit status.
    match matches.get_one::<PathBuf>("file") {
        Some(file) => {
            convert_and_report(file, &config);
        }
        None => {
            let summary = convert_all(&config)?;
            if summary.total > 0 {
                println!("\nConverted {summary} files successfully");
            }
        }
    }

    Ok(())
}
