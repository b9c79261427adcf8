/// Initializes the logging system.
///
/// This function sets up the logger based on a configuration file.
/// It should be called once at the beginning of the application's execution.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file("log4rs.yaml", Default::default())?;
    Ok(())
}

/// Initializes logging to a store-scoped folder: `{name}_logs`.
/// Creates the folder if missing and writes a single rolling log file.
///
/// # Errors
/// Returns an error if the directory cannot be created or the logger fails
/// to initialize.
pub fn init_for_store(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init_for_store_in(std::path::Path::new("."), name)
}

/// Initializes logging to a specific base directory, creating
/// `{base}/{name}_logs/{name}.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or the logger fails
/// to initialize.
pub fn init_for_store_in(
    base_dir: &std::path::Path,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use log::LevelFilter;
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;
    use std::fs;
    let log_dir = base_dir.join(format!("{name}_logs"));
    fs::create_dir_all(&log_dir)?;
    let logfile = log_dir.join(format!("{name}.log"));
    let encoder = Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}"));
    let file_appender = FileAppender::builder().encoder(encoder).build(logfile)?;
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(Root::builder().appender("file").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}
