use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::error;

use zonalkit::utils::logger::Logger;
use zonalkit::commands::{CommandFactory, ZonalkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("ZonalKit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Annotate GeoJSON regions with zonal raster statistics and quantile classes")
        .arg(
            Arg::new("raster")
                .short('r')
                .long("raster")
                .help("Input GeoTIFF raster")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("regions")
                .short('g')
                .long("regions")
                .help("Input GeoJSON FeatureCollection of regions")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output GeoJSON file (stdout when omitted)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .short('i')
                .long("inspect")
                .help("Print raster metadata and value range instead of annotating")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show a progress bar while sampling regions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file instead of stderr")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let log_file = matches.get_one::<String>("log-file").map(String::as_str);
    if let Err(e) = Logger::init(verbose, log_file) {
        eprintln!("Error initializing logger: {}", e);
        process::exit(1);
    }

    let factory = ZonalkitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
