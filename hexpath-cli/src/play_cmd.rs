//! Play command - interactive session on a terminal board
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: open_session(), run_loop()
//! - Level 3: apply_command(), apply_move(), bot_reply()
//! - Level 4: parsing and rendering utilities

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexpath_core::{
    BoardPosition, Cell, FileStore, GameBoard, GameMode, ModeKind, MoveSource, Player,
    RandomSource, MAX_SIZE, MIN_SIZE,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board side length for a fresh game
    #[arg(long, default_value = "11")]
    pub size: usize,

    /// Session mode: "two-players" or "bot"
    #[arg(long, default_value = "two-players")]
    pub mode: String,

    /// Continue from the saved game instead of starting fresh
    #[arg(long)]
    pub resume: bool,

    /// Directory holding saved games
    #[arg(long, value_name = "DIR", default_value = ".hexpath")]
    pub save_dir: PathBuf,
}

/// What answers the human's moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionKind {
    TwoPlayers,
    Bot,
}

/// A live interactive session
struct Session {
    mode: GameMode,
    bot: Option<RandomSource>,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(MoveRef),
    ToggleSound,
    ToggleMusic,
    Bigger,
    Smaller,
    NewGame,
    Quit,
}

/// A cell named either by linear id or by coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveRef {
    Id(usize),
    RowCol(usize, usize),
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// This function reads like a table of contents:
/// 1. Open the session (fresh board or saved game)
/// 2. Show the starting position
/// 3. Hand control to the input loop
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let kind = parse_session_kind(&args.mode)?;
    let mut session = open_session(&args, kind, seed)?;

    tracing::info!(
        "Starting {} session on a {}x{} board",
        args.mode,
        session.mode.size(),
        session.mode.size()
    );

    println!("Hexpath - Red joins top to bottom, Blue joins left to right");
    println!("Type 'row col' or a cell id to move; 'quit' to leave");

    // Every accepted mutation redraws the board
    session.mode.subscribe(|board| print!("{}", render_board(board)));

    print!("{}", render_board(session.mode.board()));
    println!("{}", status_line(&session.mode));
    bot_reply(&mut session);

    run_loop(&mut session)?;

    tracing::info!("Session closed");
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Open the saved slot for the chosen mode, fresh or resumed
fn open_session(args: &PlayArgs, kind: SessionKind, seed: Option<u64>) -> Result<Session> {
    let store = FileStore::open(&args.save_dir).with_context(|| {
        format!("Failed to open save directory: {}", args.save_dir.display())
    })?;

    let mode_kind = match kind {
        SessionKind::TwoPlayers => ModeKind::TwoPlayers,
        SessionKind::Bot => ModeKind::SinglePlayer,
    };

    let mode = if args.resume {
        GameMode::resume(mode_kind, Box::new(store), true, true)
    } else {
        anyhow::ensure!(
            (MIN_SIZE..=MAX_SIZE).contains(&args.size),
            "Board size must be between {} and {}",
            MIN_SIZE,
            MAX_SIZE
        );
        let mut mode = GameMode::new(mode_kind, Box::new(store), true, true);
        mode.new_game(args.size);
        mode
    };

    let bot = match kind {
        SessionKind::TwoPlayers => None,
        SessionKind::Bot => Some(RandomSource::new(seed)),
    };

    Ok(Session { mode, bot })
}

/// Read commands until quit or end of input
fn run_loop(session: &mut Session) -> Result<()> {
    let mut stdin = std::io::stdin().lock();
    let mut buf = String::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        // read_line appends, so clear between lines
        buf.clear();
        let num_bytes_read = stdin.read_line(&mut buf)?;
        if num_bytes_read == 0 {
            // EOF - the terminal went away
            break;
        }

        match parse_command(buf.trim()) {
            Some(Command::Quit) => break,
            Some(command) => apply_command(session, command),
            None => {
                println!("Commands: 'row col', a cell id, sound, music, bigger, smaller, new, quit");
            }
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Carry out one parsed command against the session
fn apply_command(session: &mut Session, command: Command) {
    match command {
        Command::Move(mv) => apply_move(session, mv),
        Command::ToggleSound => {
            session.mode.toggle_sound();
            println!("Sound {}", on_off(session.mode.sound_on()));
        }
        Command::ToggleMusic => {
            session.mode.toggle_music();
            println!("Music {}", on_off(session.mode.music_on()));
        }
        Command::Bigger => {
            session.mode.increment_size();
            println!("Board is {0}x{0}", session.mode.size());
        }
        Command::Smaller => {
            session.mode.decrement_size();
            println!("Board is {0}x{0}", session.mode.size());
        }
        Command::NewGame => {
            session.mode.new_game(session.mode.size());
            println!("{}", status_line(&session.mode));
        }
        Command::Quit => {}
    }
}

/// Try the human's move, then hand the turn to the bot if one is playing
fn apply_move(session: &mut Session, mv: MoveRef) {
    if session.mode.game_ended() {
        println!("Game over - type 'new' for a rematch");
        return;
    }

    let size = session.mode.size();
    let cell_id = match mv {
        MoveRef::Id(id) => id,
        MoveRef::RowCol(row, col) => {
            // Bound-check before converting; a stray column would wrap
            // into a different row's id
            if row >= size || col >= size {
                println!("Off the board");
                return;
            }
            BoardPosition::new(row, col).id(size)
        }
    };

    if !session.mode.play(cell_id) {
        println!("That cell is taken or off the board");
        return;
    }
    println!("{}", status_line(&session.mode));

    bot_reply(session);
}

/// Let the bot answer whenever it holds the turn
fn bot_reply(session: &mut Session) {
    if session.mode.game_ended() || session.mode.player_turn() != 2 {
        return;
    }
    let next = match session.bot.as_mut() {
        Some(bot) => bot.next_move(session.mode.board()),
        None => return,
    };
    if let Some(cell_id) = next {
        let pos = BoardPosition::from_id(cell_id, session.mode.size());
        println!("Bot plays {} {}", pos.row, pos.col);
        session.mode.play(cell_id);
        println!("{}", status_line(&session.mode));
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Map the --mode string onto a session kind
fn parse_session_kind(mode: &str) -> Result<SessionKind> {
    match mode {
        "two-players" => Ok(SessionKind::TwoPlayers),
        "bot" => Ok(SessionKind::Bot),
        other => anyhow::bail!("Unknown session mode: {} (expected two-players or bot)", other),
    }
}

/// Parse one input line; None means the line made no sense
fn parse_command(line: &str) -> Option<Command> {
    match line {
        "sound" => Some(Command::ToggleSound),
        "music" => Some(Command::ToggleMusic),
        "bigger" => Some(Command::Bigger),
        "smaller" => Some(Command::Smaller),
        "new" => Some(Command::NewGame),
        "quit" | "q" => Some(Command::Quit),
        _ => parse_move(line).map(Command::Move),
    }
}

/// Parse "id" or "row col"
fn parse_move(line: &str) -> Option<MoveRef> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?.parse().ok()?;
    match parts.next() {
        None => Some(MoveRef::Id(first)),
        Some(second) => {
            let second = second.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            Some(MoveRef::RowCol(first, second))
        }
    }
}

/// Draw the rhombus; each row shifts right so the hex columns line up
fn render_board(board: &GameBoard) -> String {
    let size = board.size();
    let mut out = String::new();
    for row in 0..size {
        out.push_str(&" ".repeat(row));
        for col in 0..size {
            let id = BoardPosition::new(row, col).id(size);
            out.push(cell_glyph(board.cell(id)));
            if col + 1 < size {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}

/// One character per cell
fn cell_glyph(cell: Cell) -> char {
    match cell {
        None => '.',
        Some(Player::Red) => 'R',
        Some(Player::Blue) => 'B',
    }
}

/// One-line summary printed under the grid
fn status_line(mode: &GameMode) -> String {
    if mode.game_ended() {
        mode.result_label().to_string()
    } else {
        format!("{}'s turn", mode.turn_label())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

// ============================================================================
// TESTS
// ============================================================================
