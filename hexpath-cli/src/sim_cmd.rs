//! Sim command - random-vs-random batches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_batch(), report_results()
//! - Level 3: play_single_game(), compute_batch_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hexpath_core::{
    GameMode, GameResult, MemoryStore, ModeKind, MoveSource, RandomSource, MAX_SIZE, MIN_SIZE,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Board side length
    #[arg(long, default_value = "11")]
    pub size: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    moves: usize,
}

/// Aggregated batch results
#[derive(Clone, Debug)]
struct BatchResults {
    games: Vec<GameRecord>,
    red_wins: usize,
    blue_wins: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run sim command
///
/// This function reads like a table of contents:
/// 1. Play the batch (random source against itself)
/// 2. Report results
pub fn run(args: SimArgs, seed: Option<u64>) -> Result<()> {
    anyhow::ensure!(
        (MIN_SIZE..=MAX_SIZE).contains(&args.size),
        "Board size must be between {} and {}",
        MIN_SIZE,
        MAX_SIZE
    );

    tracing::info!(
        "Simulating {} random games on a {}x{} board",
        args.games,
        args.size,
        args.size
    );

    let results = play_batch(&args, seed);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the batch
fn play_batch(args: &SimArgs, seed: Option<u64>) -> BatchResults {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_number in 1..=args.games {
        // Every game gets its own seed so any single game can be replayed
        let mut source = RandomSource::new(Some(rng.gen()));
        let record = play_single_game(args.size, game_number, &mut source);

        tracing::debug!(
            "Game {}: {:?} ({} moves)",
            record.game_number,
            record.result,
            record.moves
        );

        games.push(record);
    }

    compute_batch_statistics(games)
}

/// Report batch results
fn report_results(results: &BatchResults, args: &SimArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with both sides drawing from the same source
fn play_single_game(size: usize, game_number: usize, source: &mut RandomSource) -> GameRecord {
    let mut mode = GameMode::new(ModeKind::TwoPlayers, Box::new(MemoryStore::new()), false, false);
    mode.new_game(size);

    let mut moves = 0;
    // Hex has no draws; some move always connects before the grid fills
    while !mode.game_ended() {
        match source.next_move(mode.board()) {
            Some(cell_id) => {
                if mode.play(cell_id) {
                    moves += 1;
                }
            }
            None => break,
        }
    }

    GameRecord {
        game_number,
        result: mode.result(),
        moves,
    }
}

/// Compute aggregate statistics from game records
fn compute_batch_statistics(games: Vec<GameRecord>) -> BatchResults {
    let red_wins = games
        .iter()
        .filter(|g| g.result == GameResult::RedWins)
        .count();
    let blue_wins = games
        .iter()
        .filter(|g| g.result == GameResult::BlueWins)
        .count();

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    BatchResults {
        games,
        red_wins,
        blue_wins,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(results: &BatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: String,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        avg_moves: f32,
        red_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        avg_moves: results.avg_moves,
        red_win_rate: if total > 0 {
            results.red_wins as f32 / total as f32
        } else {
            0.0
        },
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: format!("{:?}", g.result),
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &BatchResults) {
    let total = results.games.len();

    println!("\n=== Simulation Results ===");
    println!("Total games: {}", total);
    println!(
        "Red wins:    {} ({:.1}%)",
        results.red_wins,
        if total > 0 {
            results.red_wins as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    );
    println!(
        "Blue wins:   {} ({:.1}%)",
        results.blue_wins,
        if total > 0 {
            results.blue_wins as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    );
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} moves",
            game.game_number, game.result, game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
