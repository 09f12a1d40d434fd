use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Log to stderr so stdout carries only the snapshot
pub fn setup(debug: bool) -> anyhow::Result<()> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{l} {d(%H:%M:%S.%3f)} {t} {m}{n}",
        )))
        .build();

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}

/// `BRICKGAME_DEBUG=1` (or `true`) turns on debug output
pub fn debug_from_env() -> bool {
    std::env::var("BRICKGAME_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}
