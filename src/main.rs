use anyhow::Context;
use rotator_traffic_gen::{
    config::Configuration,
    generator::{Pacing, TrafficGenerator},
    target::TargetGenerator,
};
use simplelog as sl;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Configuration::from_file(&config_path)
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;

    let log_file = std::fs::File::create(&config.log_path)
        .with_context(|| format!("Failed to create log file {}", config.log_path))?;
    sl::CombinedLogger::init(vec![
        sl::WriteLogger::new(config.log_level()?, sl::Config::default(), log_file),
        sl::TermLogger::new(
            sl::LevelFilter::Warn,
            sl::Config::default(),
            sl::TerminalMode::Stderr,
            sl::ColorChoice::Auto,
        ),
    ])?;

    log::info!("Rotator traffic generator starting");
    for warning in config.range_warnings() {
        log::warn!("{warning}");
    }

    let serial = serialport::new(&config.uart, config.baudrate)
        .open()
        .with_context(|| format!("Failed to open {}", config.uart))?;
    log::info!("Opened {} at {} baud", config.uart, config.baudrate);

    let targets = TargetGenerator::from_seed(config.azimuth, config.elevation, config.seed);
    let pacing = Pacing {
        read_timeout: config.read_timeout(),
        settle: config.settle(),
        interval: config.interval(),
    };

    println!("Random target generator for rotator_areg");
    let mut generator = TrafficGenerator::new(serial, std::io::stdout(), targets, pacing);
    let result = generator.run(config.iterations);

    if let Err(e) = &result {
        log::error!("Stopped: {e}");
    }
    result?;
    Ok(())
}
