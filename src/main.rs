//! # Delve Command Line Driver
//!
//! Generates floors and runs scripted simulations from a seed, for
//! inspection and replay checks.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use delve::{
    generate_floor, play_turn, shortest_path, validate_floor, DelveResult, Direction, Floor,
    FloorConfig, FloorTemplate, PlayerAction, PlayerStats, SeededRng, StaticCatalog, TurnEvent,
};
#[cfg(feature = "dev-tools")]
use tracing::{info, Level};

#[cfg(not(feature = "dev-tools"))]
use log::info;

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Deterministic dungeon crawler simulation core")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a floor and print it
    Generate {
        #[command(flatten)]
        floor: FloorArgs,

        /// Print the floor as JSON instead of an ASCII map
        #[arg(long)]
        json: bool,
    },
    /// Walk a scripted player toward the exit and print the event log
    Simulate {
        #[command(flatten)]
        floor: FloorArgs,

        /// Maximum number of turns to play
        #[arg(long, default_value_t = 50)]
        turns: u64,

        /// Print each turn's events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TemplateArg {
    Open,
    Bordered,
}

impl From<TemplateArg> for FloorTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Open => FloorTemplate::Open,
            TemplateArg::Bordered => FloorTemplate::Bordered,
        }
    }
}

/// Floor generation options shared by every subcommand.
#[derive(ClapArgs, Debug)]
struct FloorArgs {
    /// Seed string for generation
    #[arg(short, long, default_value = "delve")]
    seed: String,

    /// JSON file holding a floor configuration
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Floor depth
    #[arg(long)]
    floor: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Wall density between 0 and 1
    #[arg(long)]
    density: Option<f64>,

    /// Number of enemies
    #[arg(long)]
    enemies: Option<u32>,

    /// Number of containers
    #[arg(long)]
    containers: Option<u32>,

    #[arg(long, value_enum)]
    template: Option<TemplateArg>,
}

impl FloorArgs {
    /// Loads the config file (if any) and applies flag overrides.
    fn to_config(&self) -> DelveResult<FloorConfig> {
        let mut config = match &self.config {
            Some(path) => FloorConfig::from_json_file(path)?,
            None => FloorConfig::default(),
        };

        if let Some(floor) = self.floor {
            config.floor_number = floor;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(density) = self.density {
            config.wall_density = density;
        }
        if let Some(enemies) = self.enemies {
            config.enemy_budget = enemies;
        }
        if let Some(containers) = self.containers {
            config.container_budget = containers;
        }
        if let Some(template) = self.template {
            config.template = Some(template.into());
        }

        Ok(config)
    }
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Delve v{}", delve::VERSION);

    match &args.command {
        Command::Generate { floor, json } => run_generate(floor, *json),
        Command::Simulate { floor, turns, json } => run_simulate(floor, *turns, *json),
    }
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG`, when set, takes precedence over `--log-level`.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .init();
    }
}

fn run_generate(args: &FloorArgs, json: bool) -> DelveResult<()> {
    let config = args.to_config()?;
    let floor = generate_floor(args.seed.as_str(), &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&floor)?);
        return Ok(());
    }

    let report = validate_floor(&floor);
    println!(
        "Floor {} | seed {} | {}x{} | {} entities | solvable: {}",
        floor.floor_number,
        floor.seed,
        floor.width,
        floor.height,
        floor.entities.len(),
        report.solvable
    );
    println!("{}", floor.to_ascii(None));
    for entity in &floor.entities {
        if let Some(enemy) = entity.as_enemy() {
            println!(
                "  {} {} lvl {} hp {} at {}",
                entity.id, enemy.archetype, enemy.level, enemy.hp, entity.position
            );
        }
    }
    Ok(())
}

/// Next step toward the exit along the shortest walkable route.
fn next_direction(floor: &Floor, player: &PlayerStats) -> Option<Direction> {
    let route = shortest_path(floor, player.position, floor.exit)?;
    let next = route.get(1)?;
    Direction::from_delta(*next - player.position).ok()
}

fn run_simulate(args: &FloorArgs, turns: u64, json: bool) -> DelveResult<()> {
    let config = args.to_config()?;
    let mut floor = generate_floor(args.seed.as_str(), &config);
    let mut player = PlayerStats::new(floor.entrance);
    let mut rng = SeededRng::create(format!("{}/turns", args.seed));
    let catalog = StaticCatalog::new();

    info!(
        "Simulating up to {} turns on floor {} from seed {}",
        turns, floor.floor_number, floor.seed
    );

    for turn in 1..=turns {
        let action = match next_direction(&floor, &player) {
            Some(direction) => PlayerAction::Move { direction },
            None => PlayerAction::Wait,
        };

        let report = play_turn(floor, &player, action, turn, &mut rng, &catalog);

        if json {
            println!("{}", serde_json::to_string(&report.events)?);
        } else {
            println!(
                "turn {:>3}: hp {:>3} at {} | {}",
                turn,
                report.player.hp,
                report.player.position,
                describe(&report.events)
            );
            if let Some(aggro) = &report.aggro {
                println!("          aggro: {}", aggro.enemies.join(", "));
            }
        }

        floor = report.floor;
        player = report.player;

        if report.player_died {
            println!("Player died on turn {}", turn);
            return Ok(());
        }
        if report.reached_exit {
            println!("Player reached the exit on turn {}", turn);
            return Ok(());
        }
    }

    println!("Stopped after {} turns at {}", turns, player.position);
    Ok(())
}

fn describe(events: &[TurnEvent]) -> String {
    events
        .iter()
        .map(|event| match event {
            TurnEvent::PlayerMoved { to, .. } => format!("moved to {}", to),
            TurnEvent::MoveFailed { failure } => format!("move failed ({:?})", failure),
            TurnEvent::PlayerAttacked { hit } => format!("hit for {}", hit.amount),
            TurnEvent::EnemyKilled { enemy, xp_value } => format!("killed {} (+{} xp)", enemy, xp_value),
            TurnEvent::ItemPickedUp { pickup } => format!("picked up {}", pickup.catalog_id),
            TurnEvent::TrapTriggered { damage, .. } => format!("trap for {}", damage),
            TurnEvent::ContainerOpened { position } => format!("opened container at {}", position),
            TurnEvent::ReachedExit => "reached exit".to_string(),
            TurnEvent::AbilityCast { ability, .. } => format!("cast {}", ability),
            TurnEvent::AbilityHit { hit } => format!("spell hit for {}", hit.amount),
            TurnEvent::CastFailed { ability, .. } => format!("{} failed", ability),
            TurnEvent::Teleported { to, .. } => format!("teleported to {}", to),
            TurnEvent::Waited => "waited".to_string(),
            TurnEvent::EnemyAttack { kind, hit } => {
                format!("{:?} attack for {}", kind, hit.amount).to_lowercase()
            }
            TurnEvent::EnemyAbility { ability, hit, .. } => format!("{} for {}", ability, hit.amount),
            TurnEvent::PlayerDied => "died".to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
