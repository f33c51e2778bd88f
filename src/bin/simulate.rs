use agentlab::agents::AgentFactory;
use agentlab::config::{
    SearchConfig, ValueIterationConfig, DEFAULT_CYCLIC_ITERATIONS, DEFAULT_DEPTH,
    DEFAULT_DISCOUNT, DEFAULT_ITERATIONS, DEFAULT_THETA,
};
use agentlab::environments::gridworld::{Gridworld, DEFAULT_NOISE};
use agentlab::environments::pacman::{run_game, PacmanState};
use agentlab::errors::{AgentResult, ConfigError};
use agentlab::mdp::{
    AsynchronousValueIterationAgent, Mdp, PrioritizedSweepingValueIterationAgent,
    ValueEstimationAgent, ValueIterationAgent,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "simulate", version)]
#[command(about = "Run the search and value iteration agents on the demo worlds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play Pacman games against random ghosts
    Pacman(PacmanArgs),

    /// Solve a gridworld with one of the value iteration agents
    Gridworld(GridworldArgs),
}

#[derive(Args)]
struct PacmanArgs {
    /// reflex, minimax, alphabeta or expectimax
    #[arg(short, long, default_value = "alphabeta")]
    agent: String,

    /// Search depth in full rounds
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// score or better
    #[arg(short, long, default_value = "score")]
    evaluation: String,

    #[arg(short = 'n', long, default_value_t = 1)]
    games: usize,

    /// Seed for the agent and ghosts; entropy when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// tiny, small or trapped
    #[arg(short, long, default_value = "small")]
    layout: String,

    #[arg(long, default_value_t = 500)]
    max_moves: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct GridworldArgs {
    /// value, async or sweeping
    #[arg(short, long, default_value = "value")]
    agent: String,

    /// book, bridge, cliff or discount
    #[arg(short, long, default_value = "book")]
    grid: String,

    #[arg(short, long, default_value_t = DEFAULT_DISCOUNT)]
    discount: f64,

    /// Defaults to 100, or 1000 for the async agent
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Prioritized sweeping threshold
    #[arg(long, default_value_t = DEFAULT_THETA)]
    theta: f64,

    #[arg(long, default_value_t = DEFAULT_NOISE)]
    noise: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    living_reward: f64,

    /// Print values and policy as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StateReport {
    state: String,
    value: f64,
    policy: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Pacman(args) => simulate_pacman(&args),
        Command::Gridworld(args) => solve_gridworld(&args),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn simulate_pacman(args: &PacmanArgs) -> AgentResult<()> {
    let config = SearchConfig::new(&args.evaluation, args.depth)?;
    let start = PacmanState::named(&args.layout)?;
    let base_seed = args.seed.unwrap_or_else(rand::random);

    println!("🎮 Pacman Simulation");
    println!("====================");
    println!("Configuration:");
    println!("  - Agent: {} (depth {}, {:?})", args.agent, config.depth, config.evaluation);
    println!("  - Layout: {}", args.layout);
    println!("  - Number of games: {}", args.games);
    println!("  - Seed: {}", base_seed);

    let mut wins = 0;
    let mut total_score = 0.0;
    let mut total_moves = 0;

    for game_num in 0..args.games {
        let seed = base_seed.wrapping_add(game_num as u64);
        let mut agent = AgentFactory::create::<PacmanState>(&args.agent, config, Some(seed))?;
        if args.verbose {
            println!("\n🏁 Game {} of {}\n{}", game_num + 1, args.games, start);
        }

        let record = run_game(start.clone(), agent.as_mut(), seed, args.max_moves);
        info!("game {} finished: {:?}", game_num + 1, record);
        if record.win {
            wins += 1;
        }
        total_score += record.score;
        total_moves += record.moves;

        if args.games > 1 || args.verbose {
            let outcome = if record.win { "won" } else { "lost" };
            println!(
                "  Game {}: {} with score {} in {} moves",
                game_num + 1,
                outcome,
                record.score,
                record.moves
            );
        }
    }

    if args.games > 0 {
        let games = args.games as f64;
        println!("\n📊 Results:");
        println!("===========");
        println!("Wins: {}/{} ({:.1}%)", wins, args.games, wins as f64 / games * 100.0);
        println!("Average score: {:.1}", total_score / games);
        println!("Average moves per game: {:.1}", total_moves as f64 / games);
    }
    Ok(())
}

fn solve_gridworld(args: &GridworldArgs) -> AgentResult<()> {
    let grid = Gridworld::named(&args.grid)?
        .with_noise(args.noise)?
        .with_living_reward(args.living_reward);
    let default_iterations = match args.agent.as_str() {
        "async" => DEFAULT_CYCLIC_ITERATIONS,
        _ => DEFAULT_ITERATIONS,
    };
    let iterations = args.iterations.unwrap_or(default_iterations);
    let config = ValueIterationConfig::new(args.discount, iterations)?.with_theta(args.theta);

    match args.agent.as_str() {
        "value" => report(&grid, &ValueIterationAgent::new(&grid, config)?, args.json),
        "async" => report(
            &grid,
            &AsynchronousValueIterationAgent::new(&grid, config)?,
            args.json,
        ),
        "sweeping" => report(
            &grid,
            &PrioritizedSweepingValueIterationAgent::new(&grid, config)?,
            args.json,
        ),
        other => Err(ConfigError::unknown_agent(other).into()),
    }
}

fn report<A>(grid: &Gridworld, agent: &A, json: bool) -> AgentResult<()>
where
    A: ValueEstimationAgent<Gridworld>,
{
    if json {
        let states: Vec<StateReport> = grid
            .states()
            .iter()
            .map(|state| StateReport {
                state: state.to_string(),
                value: agent.get_value(state),
                policy: agent.get_policy(state).map(|action| action.to_string()),
            })
            .collect();
        let text = serde_json::to_string_pretty(&states).map_err(ConfigError::from)?;
        println!("{text}");
        return Ok(());
    }

    println!("📊 Values:");
    print!("{}", grid.format_values(|state| format!("{:.2}", agent.get_value(state))));
    println!("\n🧭 Policy:");
    print!(
        "{}",
        grid.format_values(|state| agent
            .get_policy(state)
            .map_or_else(|| "-".to_string(), |action| action.to_string()))
    );
    Ok(())
}
