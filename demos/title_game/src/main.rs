// Title screen demo. Usage: title_game [config.json]

use anyhow::{Context, Result};
use quadstage::{init_logging, Engine, EngineConfig, LoggingConfig};

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => EngineConfig::default().with_title("Quadstage Title"),
    };

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &config.log_filter {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    log::info!(
        "starting {}x{} with assets from {}",
        config.width,
        config.height,
        config.asset_root.display()
    );
    Engine::new(config).run()
}
