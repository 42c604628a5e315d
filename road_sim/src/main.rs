//! road_sim - Headless driver for the Road of War simulation core
//!
//! Builds a party, runs the fixed-step loop for a while and prints what
//! happened. Run with: `cargo run -p road_sim -- --party warrior:protection,priest:holy`

use anyhow::{bail, Context, Result};
use clap::Parser;
use road_core::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run the idle battler without a renderer
#[derive(Parser)]
#[command(name = "road_sim")]
#[command(about = "Headless Road of War simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory with the TOML data tables (defaults to the built-in set)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for every random roll
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 600.0)]
    seconds: f64,

    /// Fixed step in seconds
    #[arg(long, default_value_t = 0.1)]
    tick: f64,

    /// Comma-separated `class:spec` pairs
    #[arg(long, value_delimiter = ',', default_value = "warrior:protection,priest:holy,mage:fire")]
    party: Vec<String>,

    /// Starting level for every hero
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Save slot to load before and write after the run
    #[arg(long)]
    save_slot: Option<u32>,

    /// Directory holding save slots
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Print the final save snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !(cli.tick.is_finite() && cli.tick > 0.0) {
        bail!("--tick must be a positive number of seconds");
    }

    let tables = match &cli.data {
        Some(dir) => DataTables::load_from_dir(dir)
            .with_context(|| format!("loading data tables from {}", dir.display()))?,
        None => DataTables::builtin().context("parsing built-in data tables")?,
    };
    let mut sim = Simulation::new(Arc::new(tables), cli.seed);

    let mut loaded = false;
    if let Some(slot) = cli.save_slot {
        let repository = FileSaveRepository::new(&cli.save_dir)
            .with_context(|| format!("opening save dir {}", cli.save_dir.display()))?;
        sim = sim.with_save_repository(Box::new(repository));
        if sim.save_slots()?.contains(&slot) {
            sim.load_game(slot)
                .with_context(|| format!("loading slot {slot}"))?;
            loaded = true;
        }
    }

    if !loaded {
        for (n, entry) in cli.party.iter().enumerate() {
            let (class, spec) = entry
                .split_once(':')
                .with_context(|| format!("party entry `{entry}` is not class:spec"))?;
            let name = format!("{} {}", capitalize(class), n + 1);
            sim.add_hero(&class.into(), &spec.into(), cli.level, name)
                .with_context(|| format!("adding {entry}"))?;
        }
    }

    let ticks = (cli.seconds.max(0.0) / cli.tick).round() as u64;
    info!(ticks, tick = cli.tick, seed = cli.seed, "running");
    for _ in 0..ticks {
        sim.update(cli.tick);
        for event in sim.drain_events() {
            log_event(&event);
        }
    }

    if let Some(slot) = cli.save_slot {
        sim.save_game(slot)
            .with_context(|| format!("saving slot {slot}"))?;
    }

    if cli.json {
        println!("{}", sim.snapshot().to_json()?);
    } else {
        print_summary(&sim);
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn log_event(event: &CoreEvent) {
    match event {
        CoreEvent::CombatStarted { mile, enemies } => info!(mile, enemies, "combat started"),
        CoreEvent::CombatEnded {
            result,
            experience,
            gold,
        } => info!(?result, experience, gold, "combat ended"),
        CoreEvent::HeroLeveledUp { hero, level } => info!(%hero, level, "level up"),
        CoreEvent::MileReached { mile } => info!(mile, "mile reached"),
        CoreEvent::AchievementUnlocked { id } => info!(achievement = %id, "achievement unlocked"),
        CoreEvent::LootSpawned { item, .. } => info!(%item, "loot dropped"),
        _ => {}
    }
}

fn print_summary(sim: &Simulation) {
    let world = sim.world();
    let stats = sim.statistics();
    println!("Mile {} (best {})", world.current_mile, world.max_mile);
    println!(
        "Fights: {} won, {} lost, {} fled; {} enemies defeated",
        stats.combats_won, stats.combats_lost, stats.combats_retreated, stats.enemies_defeated
    );
    println!("Gold: {}  Items: {}/{}", sim.gold(), sim.inventory().len(), sim.inventory().capacity());
    for hero in sim.party().iter() {
        let max_health = sim
            .hero_stats(hero.id)
            .map(|stats| stats.max_health)
            .unwrap_or_default();
        println!(
            "  {:<12} {:<8} lvl {:>2}  hp {:>6.0}/{:<6.0}",
            hero.name, hero.class_id, hero.level, hero.current_health, max_health
        );
    }
    if !stats.achievements.is_empty() {
        let unlocked: Vec<&str> = stats.achievements.iter().map(String::as_str).collect();
        println!("Achievements: {}", unlocked.join(", "));
    }
}
