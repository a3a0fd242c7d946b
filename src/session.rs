//! Turn/session state machine.
//!
//! [`Session::handle`] is the whole protocol: it takes one [`Event`] (local
//! input or a decoded peer message), mutates boards and knowledge, and
//! returns the [`Effect`]s the caller must carry out. Nothing here touches
//! the network or the screen.

use alloc::vec::Vec;
use core::fmt;
use log::{debug, info};

use crate::board::Board;
use crate::common::{BoardError, ShotOutcome};
use crate::config::{SessionConfig, BOARD_SIZE};
use crate::knowledge::OpponentKnowledge;
use crate::protocol::{Coordinate, Message, MessageKind, WorldSnapshot};
use crate::ship::{Orientation, ShipType};

/// Which actions are valid locally and which messages are expected next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Setup,
    /// Host: searching for a surface to put the board on.
    LookingForSurface,
    /// Host: moving and scaling the board in the world.
    PlacingBoard,
    /// Peer: aligning with the host's world.
    LocalizingToBoard,
    /// Placing the fleet.
    SetupLevel,
    WaitingForReady,
    MyTurn,
    NotMyTurn,
    Win,
    Lose,
}

impl SessionState {
    pub fn is_turn_taking(self) -> bool {
        matches!(self, SessionState::MyTurn | SessionState::NotMyTurn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Win | SessionState::Lose)
    }

    /// States in which the opponent's fleet may still arrive.
    pub fn is_pre_game(self) -> bool {
        matches!(
            self,
            SessionState::Setup
                | SessionState::LookingForSurface
                | SessionState::PlacingBoard
                | SessionState::LocalizingToBoard
                | SessionState::SetupLevel
                | SessionState::WaitingForReady
        )
    }

    /// Player-facing instruction for this state.
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            SessionState::Setup => None,
            SessionState::LookingForSurface => Some("Find a flat surface to place the game."),
            SessionState::PlacingBoard => {
                Some("Scale, rotate or move the board. Tap to continue.")
            }
            SessionState::LocalizingToBoard => Some(
                "Synchronizing world map, please point the camera towards the game surface.",
            ),
            SessionState::SetupLevel => Some(
                "Place your 5 ships. Tap on the starting grid and drag in the direction of the ship.",
            ),
            SessionState::WaitingForReady => Some("Waiting for enemy to place their ships."),
            SessionState::MyTurn => {
                Some("Your turn. Tap on where you think the enemy's ships are.")
            }
            SessionState::NotMyTurn => Some("Waiting on enemy to shoot at your ships."),
            SessionState::Win => Some("You win!"),
            SessionState::Lose => Some("You lose :( better luck next time."),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The transport reports a connected peer.
    PeerConnected,
    /// Host started scanning for a surface.
    SurfaceSearchStarted,
    /// Host found a surface and can position the board.
    SurfaceFound,
    /// Peer started aligning with the host's world.
    LocalizationStarted,
    /// Presentation is ready for fleet placement. The host must supply the
    /// world snapshot it shares with the peer.
    LevelReady { world: Option<WorldSnapshot> },
    /// Local player placed the next ship.
    ShipPlaced {
        ship: ShipType,
        x: usize,
        y: usize,
        orientation: Orientation,
    },
    /// Local player took back the last placed ship.
    PlacementUndone,
    /// Local player fired at `(x, y)` on the opponent's board.
    ShotAttempted { x: usize, y: usize },
    /// A decoded message from the peer.
    MessageReceived(Message),
}

/// Work for the caller, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send to all connected peers.
    Send(Message),
    StateChanged { from: SessionState, to: SessionState },
    /// Our shot at `(x, y)` was resolved.
    ShotResolved { x: usize, y: usize, outcome: ShotOutcome },
    /// The opponent fired at `(x, y)` on our board.
    IncomingShot { x: usize, y: usize },
    OpponentBoardReceived,
    HostSettingUp,
    /// World context from the host, for the rendering layer.
    WorldContextReceived(WorldSnapshot),
}

/// Well-formed peer message that makes no sense right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    UnexpectedMessage { kind: MessageKind, state: SessionState },
    /// Host-only message received by the host.
    WrongRole(MessageKind),
    OutOfBounds(Coordinate),
    DuplicateShipInfo,
    /// A cell we already took fire on, while waiting for a new shot.
    DuplicateShot { x: usize, y: usize },
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolViolation::UnexpectedMessage { kind, state } => {
                write!(f, "{} message not expected in state {}", kind, state)
            }
            ProtocolViolation::WrongRole(kind) => {
                write!(f, "{} message is only sent by the host", kind)
            }
            ProtocolViolation::OutOfBounds(c) => {
                write!(f, "Shot at ({}, {}) is outside the board", c.x, c.y)
            }
            ProtocolViolation::DuplicateShipInfo => write!(f, "Opponent fleet already received"),
            ProtocolViolation::DuplicateShot { x, y } => {
                write!(f, "Shot at ({}, {}) was already received", x, y)
            }
        }
    }
}

/// Why an event was rejected. The session is unchanged after any error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Local input that is not valid in the current state.
    InvalidInput { input: &'static str, state: SessionState },
    /// Host reached fleet placement without a world snapshot to share.
    MissingWorldSnapshot,
    Board(BoardError),
    AlreadyBombed { x: usize, y: usize },
    Protocol(ProtocolViolation),
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        SessionError::Board(err)
    }
}

impl From<ProtocolViolation> for SessionError {
    fn from(err: ProtocolViolation) -> Self {
        SessionError::Protocol(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidInput { input, state } => {
                write!(f, "{} is not allowed in state {}", input, state)
            }
            SessionError::MissingWorldSnapshot => {
                write!(f, "Host needs a world snapshot to start fleet placement")
            }
            SessionError::Board(e) => write!(f, "{}", e),
            SessionError::AlreadyBombed { x, y } => write!(f, "({}, {}) was already bombed", x, y),
            SessionError::Protocol(e) => write!(f, "Protocol violation: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

/// Owned view of a session for the rendering layer to diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub is_server: bool,
    pub own_board: Board,
    pub opponent: Option<OpponentKnowledge>,
}

/// State of one endpoint of a match.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    own: Board,
    opponent: Option<OpponentKnowledge>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Setup,
            own: Board::new(),
            opponent: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_server(&self) -> bool {
        self.config.is_server
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn own_board(&self) -> &Board {
        &self.own
    }

    /// Opponent knowledge, once their fleet has arrived.
    pub fn opponent(&self) -> Option<&OpponentKnowledge> {
        self.opponent.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            is_server: self.config.is_server,
            own_board: self.own.clone(),
            opponent: self.opponent.clone(),
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, SessionError> {
        let mut effects = Vec::new();
        match event {
            Event::PeerConnected => {
                if self.config.is_server && self.state == SessionState::Setup {
                    effects.push(Effect::Send(Message::HostSettingUpGame));
                }
            }
            Event::SurfaceSearchStarted => {
                self.require(self.config.is_server, SessionState::Setup, "surface search")?;
                self.enter(SessionState::LookingForSurface, &mut effects);
            }
            Event::SurfaceFound => {
                self.require(self.config.is_server, SessionState::LookingForSurface, "surface found")?;
                self.enter(SessionState::PlacingBoard, &mut effects);
            }
            Event::LocalizationStarted => {
                self.require(!self.config.is_server, SessionState::Setup, "localization")?;
                self.enter(SessionState::LocalizingToBoard, &mut effects);
            }
            Event::LevelReady { world } => self.level_ready(world, &mut effects)?,
            Event::ShipPlaced {
                ship,
                x,
                y,
                orientation,
            } => self.place_ship(ship, x, y, orientation, &mut effects)?,
            Event::PlacementUndone => {
                self.require(true, SessionState::SetupLevel, "placement undo")?;
                let removed = self.own.undo_last_placement()?;
                debug!("removed {:?}", removed);
            }
            Event::ShotAttempted { x, y } => self.shoot(x, y, &mut effects)?,
            Event::MessageReceived(message) => self.receive(message, &mut effects)?,
        }
        Ok(effects)
    }

    fn require(
        &self,
        role_ok: bool,
        state: SessionState,
        input: &'static str,
    ) -> Result<(), SessionError> {
        if role_ok && self.state == state {
            Ok(())
        } else {
            Err(SessionError::InvalidInput {
                input,
                state: self.state,
            })
        }
    }

    fn level_ready(
        &mut self,
        world: Option<WorldSnapshot>,
        effects: &mut Vec<Effect>,
    ) -> Result<(), SessionError> {
        let from = if self.config.is_server {
            SessionState::PlacingBoard
        } else {
            SessionState::LocalizingToBoard
        };
        self.require(true, from, "level ready")?;
        if self.config.is_server {
            let world = world.ok_or(SessionError::MissingWorldSnapshot)?;
            self.enter(SessionState::SetupLevel, effects);
            effects.push(Effect::Send(Message::WorldMapData(world)));
        } else {
            self.enter(SessionState::SetupLevel, effects);
        }
        Ok(())
    }

    fn place_ship(
        &mut self,
        ship: ShipType,
        x: usize,
        y: usize,
        orientation: Orientation,
        effects: &mut Vec<Effect>,
    ) -> Result<(), SessionError> {
        self.require(true, SessionState::SetupLevel, "ship placement")?;
        self.own
            .place_ship(ship, x, y, orientation, self.config.overlap)?;
        if self.own.is_complete() {
            self.enter(SessionState::WaitingForReady, effects);
        }
        Ok(())
    }

    fn shoot(&mut self, x: usize, y: usize, effects: &mut Vec<Effect>) -> Result<(), SessionError> {
        self.require(true, SessionState::MyTurn, "shot")?;
        let Some(knowledge) = self.opponent.as_mut() else {
            return Err(SessionError::InvalidInput {
                input: "shot",
                state: self.state,
            });
        };
        if knowledge.record_bomb(x, y)? {
            return Err(SessionError::AlreadyBombed { x, y });
        }
        let outcome = knowledge.resolve_shot(x, y);
        let won = knowledge.all_sunk();
        debug!("shot at ({}, {}): {:?}", x, y, outcome);
        effects.push(Effect::ShotResolved { x, y, outcome });

        let shot = Message::Shoot(Coordinate::new(x as i32, y as i32));
        if won {
            // Win goes out before the final shot so the opponent never gets
            // another turn.
            self.enter(SessionState::Win, effects);
            effects.push(Effect::Send(shot));
        } else {
            effects.push(Effect::Send(shot));
            self.enter(SessionState::NotMyTurn, effects);
        }
        Ok(())
    }

    fn receive(&mut self, message: Message, effects: &mut Vec<Effect>) -> Result<(), SessionError> {
        let kind = message.kind();
        let unexpected = ProtocolViolation::UnexpectedMessage {
            kind,
            state: self.state,
        };
        match message {
            Message::HostSettingUpGame => {
                if self.config.is_server {
                    return Err(ProtocolViolation::WrongRole(kind).into());
                }
                if !self.state.is_pre_game() {
                    return Err(unexpected.into());
                }
                effects.push(Effect::HostSettingUp);
            }
            Message::WorldMapData(world) => {
                if self.config.is_server {
                    return Err(ProtocolViolation::WrongRole(kind).into());
                }
                if !self.state.is_pre_game() {
                    return Err(unexpected.into());
                }
                effects.push(Effect::WorldContextReceived(world));
            }
            Message::SendShipInfo(board) => {
                if self.opponent.is_some() {
                    return Err(ProtocolViolation::DuplicateShipInfo.into());
                }
                if !self.state.is_pre_game() {
                    return Err(unexpected.into());
                }
                self.opponent = Some(OpponentKnowledge::ingest(board));
                effects.push(Effect::OpponentBoardReceived);
                if self.state == SessionState::WaitingForReady {
                    let first = self.first_turn();
                    self.enter(first, effects);
                }
            }
            Message::Shoot(coordinate) => {
                if !matches!(self.state, SessionState::NotMyTurn | SessionState::Lose) {
                    return Err(unexpected.into());
                }
                let (x, y) = coordinate
                    .cell(BOARD_SIZE as usize)
                    .ok_or(ProtocolViolation::OutOfBounds(coordinate))?;
                let already = self.own.record_bomb(x, y)?;
                if self.state == SessionState::NotMyTurn {
                    if already {
                        return Err(ProtocolViolation::DuplicateShot { x, y }.into());
                    }
                    effects.push(Effect::IncomingShot { x, y });
                    self.enter(SessionState::MyTurn, effects);
                } else if !already {
                    effects.push(Effect::IncomingShot { x, y });
                }
            }
            Message::Win => {
                if !self.state.is_turn_taking() {
                    return Err(unexpected.into());
                }
                self.enter(SessionState::Lose, effects);
            }
        }
        Ok(())
    }

    fn first_turn(&self) -> SessionState {
        if self.config.is_server {
            SessionState::MyTurn
        } else {
            SessionState::NotMyTurn
        }
    }

    /// Move to `to` and run its entry actions.
    fn enter(&mut self, to: SessionState, effects: &mut Vec<Effect>) {
        let from = self.state;
        self.state = to;
        info!("session {} -> {}", from, to);
        effects.push(Effect::StateChanged { from, to });
        match to {
            SessionState::WaitingForReady => {
                self.own.finalize();
                effects.push(Effect::Send(Message::SendShipInfo(self.own.clone())));
                if self.opponent.is_some() {
                    let first = self.first_turn();
                    self.enter(first, effects);
                }
            }
            SessionState::Win => effects.push(Effect::Send(Message::Win)),
            SessionState::Lose => {
                if let Some(knowledge) = self.opponent.as_mut() {
                    knowledge.reset_counters();
                }
            }
            _ => {}
        }
    }
}
