mod args;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;
use simplelog::ColorChoice;
use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::LevelPadding;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use crate::args::CommandLineOptions;
use gsph::io::checkpoint;
use gsph::io::initial_conditions::load_initial_conditions;
use gsph::io::output::TextSnapshotWriter;
use gsph::prelude::Parameters;
use gsph::prelude::Simulation;
use gsph::simulation::Driver;

fn main() -> Result<()> {
    let options = CommandLineOptions::parse();
    init_logging(options.verbosity)?;
    let (mut sim, parameters) = match (&options.resume, &options.parameter_file) {
        (Some(checkpoint_path), _) => {
            info!("resuming from {:?}", checkpoint_path);
            checkpoint::load(checkpoint_path)?.into_simulation()?
        }
        (None, Some(parameter_file)) => {
            let parameters = Parameters::from_yaml_file(parameter_file)?;
            let ic_path = parameters
                .simulation
                .initial_conditions
                .clone()
                .context("no initial_conditions configured in the simulation section")?;
            let particles = load_initial_conditions(&ic_path, &parameters)?;
            (Simulation::new(&parameters, particles)?, parameters)
        }
        (None, None) => anyhow::bail!("either a parameter file or --resume is required"),
    };
    let sink = Box::new(TextSnapshotWriter::new(parameters.output.output_dir.clone()));
    let mut driver = Driver::new(&parameters, sink)?;
    driver.run(&mut sim, &parameters)?;
    Ok(())
}

fn init_logging(verbosity: u64) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::default()
        .set_level_padding(LevelPadding::Right)
        .set_thread_level(LevelFilter::Off)
        .build();
    TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto)?;
    Ok(())
}
