use ayaview::{
    catalog::Catalog,
    cli::Cli,
    config::{Config, get_app_data_prefix},
    logging::{self, LogLevel},
    navigation::PositionStore,
    state::State,
    ui::viewer::Viewer,
};

use clap::Parser;
use eyre::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = LogLevel::from_verbosity(cli.verbose, cli.debug);

    // The viewer takes over the terminal, so only the one-shot modes log to stderr
    let interactive = !cli.position && !cli.dump;
    if interactive {
        let log_path = match &cli.log_file {
            Some(path) => Some(path.clone()),
            None => get_app_data_prefix().ok().map(|p| p.join("ayaview.log")),
        };
        match log_path {
            Some(path) => {
                if let Err(err) = logging::init_file(level, &path) {
                    eprintln!("Warning: Could not open log file {}: {}", path.display(), err);
                    logging::init(LogLevel::Error);
                }
            }
            None => logging::init(LogLevel::Error),
        }
    } else {
        logging::init(level);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::new()?,
    };
    if let Some(db) = &cli.db {
        config.settings.database = db.to_string_lossy().to_string();
    }
    if let Some(media_root) = &cli.media_root {
        config.settings.media_root = media_root.to_string_lossy().to_string();
    }
    logging::debug(format!(
        "database {}, media root {}",
        config.database_path().display(),
        config.media_root().display()
    ));

    if cli.position {
        print_position(&config)
    } else if cli.dump {
        dump_catalog(&config)
    } else {
        let mut viewer = Viewer::new(config)?;
        viewer.run()
    }
}

fn print_position(config: &Config) -> Result<()> {
    let state = State::open(&config.database_path())?;
    println!("{}", state.read_position()?);
    Ok(())
}

fn dump_catalog(config: &Config) -> Result<()> {
    let state = State::open(&config.database_path())?;
    let catalog = Catalog::load(&state, &config.media_root())?;
    for record in catalog.records() {
        let suffix = record
            .verse_suffix
            .map(|s| s.to_string())
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.id,
            record.surah_number,
            record.surah_name,
            record.verse_number,
            suffix,
            record.audio_path.display(),
            record.image_path.display()
        );
    }
    Ok(())
}
