//! Terminal player.

use std::io::{self, BufRead, Write};
use std::string::String;

use rand::rngs::SmallRng;

use crate::board::{Board, BB};
use crate::common::ShotOutcome;
use crate::config::{OverlapPolicy, BOARD_SIZE, NUM_SHIPS, SHIPS};
use crate::knowledge::OpponentKnowledge;
use crate::session::{Effect, Session, SessionError};
use crate::ship::{Orientation, ShipType};

use super::Player;

pub struct CliPlayer;

impl CliPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// `(x, y)` as column letter and 1-based row, e.g. `(0, 4)` is `A5`.
pub fn coord_to_string(x: usize, y: usize) -> String {
    let col = (b'A' + x as u8) as char;
    format!("{}{}", col, y + 1)
}

/// Parse `A5`-style input into `(x, y)`.
pub fn parse_coord(input: &str) -> Result<(usize, usize), String> {
    let mut chars = input.trim().chars();
    let col_ch = chars
        .next()
        .ok_or_else(|| "Empty input".to_string())?
        .to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let x = (col_ch as u8 - b'A') as usize;
    if x >= BOARD_SIZE as usize {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE as usize {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Ok((x, row - 1))
}

/// Parse `A5 H` / `A5 V` placement input. Orientation defaults to horizontal.
pub fn parse_placement(input: &str) -> Result<(usize, usize, Orientation), String> {
    let mut parts = input.split_whitespace();
    let (x, y) = parse_coord(parts.next().unwrap_or(""))?;
    let orientation = match parts.next().and_then(|s| s.chars().next()) {
        None | Some('h') | Some('H') => Orientation::Horizontal,
        Some('v') | Some('V') => Orientation::Vertical,
        Some(other) => return Err(format!("Invalid orientation '{}' - use H or V", other)),
    };
    Ok((x, y, orientation))
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn print_grid(title: &str, cell: impl Fn(usize, usize) -> char) {
    println!("{}", title);
    print!("    ");
    for x in 0..BOARD_SIZE as usize {
        print!(" {}", (b'A' + x as u8) as char);
    }
    println!();
    for y in 0..BOARD_SIZE as usize {
        print!("  {:2}", y + 1);
        for x in 0..BOARD_SIZE as usize {
            print!(" {}", cell(x, y));
        }
        println!();
    }
}

/// Own fleet with incoming fire: `S` ship, `X` hit, `o` miss.
pub fn print_own_board(board: &Board) {
    let ships: BB = board.occupancy();
    print_grid("Your board:", |x, y| {
        let ship = ships.get(x, y).unwrap_or(false);
        match (board.is_bombed(x, y), ship) {
            (true, true) => 'X',
            (true, false) => 'o',
            (false, true) => 'S',
            (false, false) => '.',
        }
    });
}

/// Our shots at the opponent: `X` hit, `o` miss, `#` sunk ship.
pub fn print_opponent_board(opponent: &OpponentKnowledge) {
    let mut sunk = BB::new();
    for (_, ship) in opponent.sunk_ships() {
        sunk = sunk | ship.mask();
    }
    print_grid("Opponent board:", |x, y| {
        if sunk.get(x, y).unwrap_or(false) {
            '#'
        } else if !opponent.board().is_bombed(x, y) {
            '.'
        } else if opponent.ship_index_at(x, y).is_some() {
            'X'
        } else {
            'o'
        }
    });
}

impl Player for CliPlayer {
    fn place_ship(
        &mut self,
        rng: &mut SmallRng,
        board: &Board,
        ship: ShipType,
        overlap: OverlapPolicy,
    ) -> Option<(usize, usize, Orientation)> {
        print_own_board(board);
        let index = board.placed_ships().len();
        println!(
            "Ship {}/{}: {} (length {})",
            index + 1,
            NUM_SHIPS,
            ship.name(),
            ship.length()
        );
        loop {
            let line = read_line("Enter placement like 'A5 H' (ENTER for random): ")?;
            if line.is_empty() {
                match board.random_placement(rng, overlap) {
                    Ok(placement) => return Some(placement),
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                }
            }
            match parse_placement(&line) {
                Ok(placement) => return Some(placement),
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    fn select_target(
        &mut self,
        _rng: &mut SmallRng,
        opponent: &OpponentKnowledge,
    ) -> Option<(usize, usize)> {
        print_opponent_board(opponent);
        loop {
            let line = read_line("Enter target like 'B7': ")?;
            match parse_coord(&line) {
                Ok((x, y)) if opponent.board().is_bombed(x, y) => {
                    println!("You already fired at {}.", coord_to_string(x, y));
                }
                Ok(target) => return Some(target),
                Err(e) => println!("Invalid coordinate: {}", e),
            }
        }
    }

    fn observe(&mut self, session: &Session, effect: &Effect) {
        match effect {
            Effect::StateChanged { to, .. } => {
                if let Some(text) = to.instruction() {
                    println!("\n{}", text);
                }
            }
            Effect::ShotResolved { x, y, outcome } => {
                let at = coord_to_string(*x, *y);
                match outcome {
                    ShotOutcome::Miss => println!("Miss at {}.", at),
                    ShotOutcome::Hit(_) => println!("HIT at {}!", at),
                    ShotOutcome::HitAndSunk(i) => {
                        println!("SUNK! You destroyed the enemy's {}.", SHIPS[*i].name())
                    }
                }
            }
            Effect::IncomingShot { x, y } => {
                let hit = session.own_board().occupancy().get(*x, *y).unwrap_or(false);
                let verdict = if hit { "hit your ship" } else { "missed" };
                println!("Enemy fired at {} and {}.", coord_to_string(*x, *y), verdict);
            }
            Effect::HostSettingUp => println!("Host is setting up the game..."),
            _ => {}
        }
    }

    fn rejected(&mut self, error: &SessionError) {
        println!("Rejected: {}", error);
    }
}
