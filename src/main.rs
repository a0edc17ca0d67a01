//! Headless runner.
//!
//! Loads the content folder, spawns an area and runs it for a number of
//! logic ticks, then prints what happened.
//!
//! Order of operations:
//! 1. Parse the command line and load `config.ini`
//! 2. Create the session and load mob types on the background loader
//! 3. Load the area file and spawn its mobs
//! 4. Run the logic schedule for `--ticks` frames
//! 5. Print a summary and tear the session down

use clap::Parser;
use std::path::PathBuf;

use mobcore::components::mob::Mob;
use mobcore::fsm::runtime::current_state_name;
use mobcore::gameplay::GameplaySession;
use mobcore::mobs::mobtype::MobCategoryId;
use mobcore::resources::gameconfig::GameConfig;

/// Mob behavior core, headless.
#[derive(Parser)]
#[command(version, about = "Runs an area's mob logic without a window")]
struct Cli {
    /// Content folder (overrides the config file).
    #[arg(long, value_name = "DIR")]
    content: Option<PathBuf>,

    /// Area file to play.
    #[arg(long, value_name = "FILE", default_value = "assets/areas/test_field.json")]
    area: PathBuf,

    /// Logic ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Config file.
    #[arg(long, value_name = "FILE", default_value = "./config.ini")]
    config: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(content) = cli.content {
        config.content_folder = content;
    }

    let mut session = GameplaySession::new(config);
    let loaded = session.load_content();
    if loaded == 0 {
        eprintln!(
            "Error: no mob types found in {}",
            session.config().content_folder.display()
        );
        std::process::exit(1);
    }

    if let Err(e) = session.load_area_file(&cli.area) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    for _ in 0..cli.ticks {
        session.tick();
    }

    println!("After {} ticks:", cli.ticks);
    for id in MobCategoryId::ALL {
        let count = session.mob_count(id);
        if count > 0 {
            println!("  {:?}: {}", id, count);
        }
    }
    for mob in session.live_mobs() {
        let Some(m) = session.world.get::<Mob>(mob) else {
            continue;
        };
        println!(
            "  {:?} {:?} \"{}\" in {}",
            mob,
            m.mob_type.category,
            m.mob_type.name,
            current_state_name(&session.world, mob).unwrap_or_else(|| "?".to_string())
        );
    }
    println!("  score: {}", session.score());
    if !session.errors().is_empty() {
        println!("  content errors: {}", session.errors().len());
    }

    session.teardown();
}
