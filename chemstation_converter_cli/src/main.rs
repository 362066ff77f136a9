use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libchemstation_converter::config::Config;
use libchemstation_converter::process::process;

fn make_template_config(path: &Path) -> std::io::Result<()> {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).map_err(std::io::Error::other)?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())
}

fn main() {
    // Create a cli
    let matches = Command::new("chemstation_converter_cli")
        .about("Convert ChemStation GC acquisitions to JSON documents")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required (-p/--path)");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match make_template_config(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => log::error!("Could not write template config: {e}"),
        }
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Input Path: {}", config.input_path.to_string_lossy());
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    log::info!("Binary Only: {}", config.binary_only);
    log::info!("Time Zone: {}", config.time_zone);
    log::info!("Merge Strategy: {:?}", config.merge_strategy);

    if !config.is_input_valid() {
        log::error!(
            "Input path {} does not exist!",
            config.input_path.to_string_lossy()
        );
        return;
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    let status = Arc::new(Mutex::new(0.0));
    let sent_status = status.clone();
    // Spawn the task!
    let handle = std::thread::spawn(|| process(config, sent_status));

    loop {
        // No UI here, so poll roughly every 100 ms
        std::thread::sleep(std::time::Duration::from_millis(100));
        match status.lock() {
            Ok(stat) => pb.set_position((*stat * 100.0) as u64),
            Err(e) => log::error!("{e}"),
        }

        if handle.is_finished() {
            match handle.join() {
                Ok(result) => match result {
                    Ok(_) => log::info!("Successfully converted data!"),
                    Err(e) => log::error!("Conversion failed with error: {e}"),
                },
                Err(_) => log::error!("Failed to join conversion task!"),
            }
            break;
        }
    }

    pb.finish();

    log::info!("Done.");
}
