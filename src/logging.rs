use log::LevelFilter;

/// Terminal logging for hosts of the engine. Library code only talks to the
/// `log` facade.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
}
