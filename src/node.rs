#![cfg(feature = "std")]
//! One endpoint of a match: a [`Session`] wired to a codec and a transport.
//!
//! The node is the single execution context for its session. Local input
//! and peer messages both pass through [`SessionNode::submit`], so the
//! session is never mutated concurrently. Sends are fire-and-forget; a
//! failed send is logged and the match simply stalls.

use std::boxed::Box;
use std::vec::Vec;

use log::{debug, warn};
use rand::rngs::SmallRng;
use tokio::task::yield_now;

use crate::codec::Codec;
use crate::player::Player;
use crate::protocol::WorldSnapshot;
use crate::session::{Effect, Event, Session, SessionError, SessionState};
use crate::transport::Transport;

/// Consecutive rejected local inputs after which [`SessionNode::run`] gives
/// up on the player.
pub const MAX_REJECTED_INPUTS: usize = 1000;

pub struct SessionNode {
    session: Session,
    codec: Codec,
    transport: Box<dyn Transport>,
    world: Option<WorldSnapshot>,
}

impl SessionNode {
    pub fn new(session: Session, codec: Codec, transport: Box<dyn Transport>) -> Self {
        Self {
            session,
            codec,
            transport,
            world: None,
        }
    }

    /// World snapshot the host shares when fleet placement starts.
    pub fn with_world(mut self, world: WorldSnapshot) -> Self {
        self.world = Some(world);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Apply `event` and transmit any outgoing messages it produced.
    pub async fn submit(&mut self, event: Event) -> Result<Vec<Effect>, SessionError> {
        let effects = self.session.handle(event)?;
        for effect in &effects {
            if let Effect::Send(message) = effect {
                let bytes = match self.codec.encode(message) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("dropping outgoing {}: {}", message.kind(), e);
                        continue;
                    }
                };
                if let Err(e) = self.transport.send(bytes).await {
                    warn!("send of {} failed: {}", message.kind(), e);
                } else {
                    debug!("sent {}", message.kind());
                }
            }
        }
        Ok(effects)
    }

    /// Decode and apply one incoming message. Malformed or unexpected
    /// messages are logged and dropped.
    pub async fn on_bytes(&mut self, bytes: &[u8]) -> Vec<Effect> {
        let message = match self.codec.decode(bytes) {
            Ok(message) => message,
            Err(e) => {
                warn!("dropping undecodable message: {}", e);
                return Vec::new();
            }
        };
        let kind = message.kind();
        match self.submit(Event::MessageReceived(message)).await {
            Ok(effects) => effects,
            Err(e) => {
                warn!("dropping {} message: {}", kind, e);
                Vec::new()
            }
        }
    }

    /// Play a whole match for `player` and return the final state.
    ///
    /// The host walks through surface search and board placement straight
    /// away; the peer waits for the host's world context before placing its
    /// fleet. Fails when the transport fails to deliver, when the player has
    /// no input left, or after [`MAX_REJECTED_INPUTS`] rejected inputs in a
    /// row.
    pub async fn run(
        &mut self,
        player: &mut dyn Player,
        rng: &mut SmallRng,
    ) -> anyhow::Result<SessionState> {
        self.drive(player, Event::PeerConnected).await;
        if self.session.is_server() {
            self.drive(player, Event::SurfaceSearchStarted).await;
            self.drive(player, Event::SurfaceFound).await;
            let world = self.world.clone().unwrap_or_default();
            self.drive(player, Event::LevelReady { world: Some(world) }).await;
        } else {
            self.drive(player, Event::LocalizationStarted).await;
        }

        let mut rejected = 0;
        loop {
            let accepted = match self.session.state() {
                SessionState::Win | SessionState::Lose => break,
                SessionState::SetupLevel => {
                    let board = self.session.own_board();
                    let Some(ship) = board.next_ship() else {
                        anyhow::bail!("fleet complete while still placing ships");
                    };
                    let overlap = self.session.config().overlap;
                    let Some((x, y, orientation)) = player.place_ship(rng, board, ship, overlap)
                    else {
                        anyhow::bail!("player gave up placing the {}", ship.name());
                    };
                    let event = Event::ShipPlaced {
                        ship,
                        x,
                        y,
                        orientation,
                    };
                    self.drive(player, event).await
                }
                SessionState::MyTurn => {
                    let Some(opponent) = self.session.opponent() else {
                        anyhow::bail!("my turn without the opponent's fleet");
                    };
                    let Some((x, y)) = player.select_target(rng, opponent) else {
                        anyhow::bail!("player has no target left to fire at");
                    };
                    self.drive(player, Event::ShotAttempted { x, y }).await
                }
                _ => {
                    let bytes = self.transport.recv().await?;
                    let effects = self.on_bytes(&bytes).await;
                    self.notify(player, &effects);
                    let world_arrived = effects
                        .iter()
                        .any(|e| matches!(e, Effect::WorldContextReceived(_)));
                    if world_arrived && self.session.state() == SessionState::LocalizingToBoard {
                        self.drive(player, Event::LevelReady { world: None }).await;
                    }
                    true
                }
            };
            if accepted {
                rejected = 0;
                continue;
            }
            rejected += 1;
            if rejected >= MAX_REJECTED_INPUTS {
                anyhow::bail!(
                    "{} consecutive inputs rejected in state {}",
                    rejected,
                    self.session.state()
                );
            }
            yield_now().await;
        }
        if self.session.state() == SessionState::Lose {
            self.absorb_final_shot(player).await;
        }
        Ok(self.session.state())
    }

    /// The winner's last shot trails its `Win`; mark it on our board. A
    /// duplicated `Win` may arrive first.
    async fn absorb_final_shot(&mut self, player: &mut dyn Player) {
        for _ in 0..2 {
            let Ok(bytes) = self.transport.recv().await else {
                return;
            };
            let effects = self.on_bytes(&bytes).await;
            self.notify(player, &effects);
            if effects
                .iter()
                .any(|e| matches!(e, Effect::IncomingShot { .. }))
            {
                return;
            }
        }
    }

    /// Submit local input, routing effects and rejections to the player.
    /// Returns whether the session accepted it.
    async fn drive(&mut self, player: &mut dyn Player, event: Event) -> bool {
        match self.submit(event).await {
            Ok(effects) => {
                self.notify(player, &effects);
                true
            }
            Err(e) => {
                debug!("input rejected: {}", e);
                player.rejected(&e);
                false
            }
        }
    }

    fn notify(&self, player: &mut dyn Player, effects: &[Effect]) {
        for effect in effects {
            player.observe(&self.session, effect);
        }
    }
}
