//! Headless turn simulator
//!
//! Loads an ASCII level, runs the visibility engine and the actor controller
//! for a number of turns and prints what the actors decided.

use std::path::PathBuf;
use std::process::ExitCode;

use ahash::AHashMap;
use clap::Parser;
use gloomdelve::ai::{NoiseLog, SpellCatalog};
use gloomdelve::vision::VisibilitySnapshot;
use gloomdelve::{
    ActorBehaviorController, CoreConfig, Level, MapView, PlayerTarget, TemplateCatalog, TurnReport,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Run the actor controller against an ASCII level
#[derive(Parser, Debug)]
#[command(name = "turn_sim")]
#[command(about = "Run visibility and actor behavior over an ASCII level")]
struct Args {
    /// ASCII level: `@` is the player, legend symbols are actors
    #[arg(long, default_value = "data/maps/cavern.txt")]
    map: PathBuf,

    /// Actor templates (JSON array)
    #[arg(long, default_value = "data/actors.json")]
    templates: PathBuf,

    /// Spell definitions (JSON array)
    #[arg(long, default_value = "data/spells.json")]
    spells: PathBuf,

    /// Optional TOML configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Actor legend entries, `symbol=TEMPLATE_ID`
    #[arg(long = "legend", value_parser = parse_legend_entry)]
    legend: Vec<(char, String)>,

    /// Dungeon depth (0 = town)
    #[arg(long, default_value_t = 1)]
    depth: i32,

    /// Number of turns to simulate
    #[arg(long, default_value_t = 20)]
    turns: u64,

    /// Turn to start on (moves the day/night clock)
    #[arg(long, default_value_t = 0)]
    start_turn: u64,

    /// Overrides the configured seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 30)]
    gold: i64,

    #[arg(long, default_value_t = 0)]
    stealth: i32,

    /// Carried light radius
    #[arg(long, default_value_t = 3)]
    light: i32,

    /// Player moves, one vi-key per turn (hjklyubn, `.` waits)
    #[arg(long, default_value = "")]
    moves: String,

    /// Write the final visibility grid and all reports as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Serialize)]
struct SimDump {
    seed: u64,
    player: PlayerTarget,
    map: Vec<String>,
    visibility: VisibilitySnapshot,
    reports: Vec<TurnReport>,
}

fn parse_legend_entry(entry: &str) -> Result<(char, String), String> {
    let (symbol, id) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected symbol=TEMPLATE_ID, got '{entry}'"))?;
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !id.is_empty() => Ok((c, id.to_string())),
        _ => Err(format!("bad legend entry '{entry}'")),
    }
}

fn default_legend() -> AHashMap<char, String> {
    [
        ('o', "ORC_WARRIOR"),
        ('k', "KOBOLD_ARCHER"),
        ('w', "WOLF"),
        ('t', "CUTPURSE"),
        ('b', "BEGGAR"),
        ('m', "GREEN_MOLD"),
        ('r', "CAVE_RAT"),
        ('S', "KOBOLD_SHAMAN"),
        ('d', "DRUNK"),
        ('i', "VILLAGE_IDIOT"),
    ]
    .into_iter()
    .map(|(c, id)| (c, id.to_string()))
    .collect()
}

/// vi-key to step offset
fn step_for(key: char) -> Option<(i32, i32)> {
    match key {
        'h' => Some((-1, 0)),
        'l' => Some((1, 0)),
        'k' => Some((0, -1)),
        'j' => Some((0, 1)),
        'y' => Some((-1, -1)),
        'u' => Some((1, -1)),
        'b' => Some((-1, 1)),
        'n' => Some((1, 1)),
        _ => None,
    }
}

fn run(args: Args) -> gloomdelve::Result<()> {
    let mut config = match &args.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.ai.seed = seed;
    }

    let templates = TemplateCatalog::load(&args.templates)?;
    let spells = SpellCatalog::load(&args.spells)?;
    let layout = std::fs::read_to_string(&args.map)?;
    let rows: Vec<&str> = layout.lines().filter(|line| !line.trim().is_empty()).collect();

    let mut legend = default_legend();
    legend.extend(args.legend.iter().cloned());

    let mut rng = ChaCha8Rng::seed_from_u64(config.ai.seed);
    let (mut level, start) = Level::from_ascii(&rows, args.depth, &config, &templates, &legend, &mut rng)?;
    let mut player = PlayerTarget::new(start)
        .with_gold(args.gold)
        .with_stealth(args.stealth)
        .with_light(args.light);
    let mut controller = ActorBehaviorController::new(config.ai.clone(), config.detection.clone(), NoiseLog::new(), spells);

    tracing::info!(
        seed = config.ai.seed,
        actors = level.actors.len(),
        turns = args.turns,
        "starting simulation"
    );

    let mut moves = args.moves.chars();
    let mut reports = Vec::new();
    for turn in args.start_turn..args.start_turn + args.turns {
        if let Some((dx, dy)) = moves.next().and_then(step_for) {
            let to = player.position.offset(dx, dy);
            let open = level.map.tile_at(to).is_some_and(|t| t.is_ai_walkable());
            if open && level.actors.occupant_at(to).is_none() {
                player.position = to;
            }
        }

        let report = level.advance_turn(&mut controller, &mut player, turn);
        let noises = controller.noise_mut().drain();

        println!(
            "turn {:>4} {:?} player {} gold {} | {} acted, {} culled, {} noises",
            turn,
            level.cycle.time_of_day(turn),
            player.position,
            player.gold,
            report.processed,
            report.culled,
            noises.len()
        );
        for event in &report.events {
            if !event.description.is_empty() {
                println!("    {} {}", event.actor, event.description);
            }
        }
        reports.push(report);
    }

    println!(
        "explored {} tiles, {} visible, {} actors left",
        level.visibility.explored_count(),
        level.visibility.visible_count(),
        level.actors.len()
    );

    if let Some(path) = &args.dump {
        let dump = SimDump {
            seed: config.ai.seed,
            player,
            map: level.map.rows(),
            visibility: level.visibility.snapshot(),
            reports,
        };
        std::fs::write(path, serde_json::to_string_pretty(&dump)?)?;
        tracing::info!(path = %path.display(), "wrote simulation dump");
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gloomdelve=info,turn_sim=info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("turn_sim: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_entry_parsing() {
        assert_eq!(parse_legend_entry("g=GHOUL"), Ok(('g', "GHOUL".to_string())));
        assert!(parse_legend_entry("gg=GHOUL").is_err());
        assert!(parse_legend_entry("g=").is_err());
        assert!(parse_legend_entry("GHOUL").is_err());
    }

    #[test]
    fn test_vi_keys() {
        assert_eq!(step_for('h'), Some((-1, 0)));
        assert_eq!(step_for('j'), Some((0, 1)));
        assert_eq!(step_for('.'), None);
    }
}
