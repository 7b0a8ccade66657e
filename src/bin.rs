extern crate nanorewrite;
extern crate log;
extern crate fern;

use nanorewrite::Client;
use nanorewrite::constants::LOG_ENV_VAR;

fn main() {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|level| level.parse::<log::LogLevelFilter>().ok())
        .unwrap_or(log::LogLevelFilter::Info);

    let logger_config = fern::DispatchConfig {
        format: Box::new(|msg: &str, level: &log::LogLevel, location: &log::LogLocation| {
            format!("[{}][{}] {}", location.module_path(), level, msg)
        }),
        output: vec![fern::OutputConfig::stdout()],
        level: level,
    };

    if let Err(e) = fern::init_global_logger(logger_config, level) {
        panic!("Failed to initialize global logger: {}", e);
    }

    let mut client = Client::new();

    client.run();
}
