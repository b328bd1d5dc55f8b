//! Power resolver: Look (queen) and Joker (jack) windows.
//!
//! A power window opens when a queen or jack lands on the discard pile, from
//! either a turn or a response. Only the triggering play's window is ever
//! open; when it ends, the respond window takes over.

use tracing::{debug, info};

use super::state::{GameSession, LookReveal, Phase, PowerState};
use super::window::{Clock, WindowKind};
use crate::cards::{Power, Rank, Slot};
use crate::core::{Command, CommandError, SeatId};

impl<C: Clock> GameSession<C> {
    /// Queen power: reveal the card at `(seat, index)` to the acting seat.
    pub fn look_reveal(&mut self, seat: SeatId, index: usize) -> Result<(), CommandError> {
        self.apply(Command::LookReveal { seat, index })
    }

    /// Jack power: pick one of two slots to swap unseen.
    pub fn joker_pick(&mut self, seat: SeatId, index: usize) -> Result<(), CommandError> {
        self.apply(Command::JokerPick { seat, index })
    }

    /// Open the power window for `rank`, or go straight to responding.
    pub(super) fn trigger_power_or_respond(&mut self, actor: SeatId, rank: Rank) {
        match rank.power() {
            Some(kind) => {
                self.power = Some(PowerState {
                    kind,
                    actor,
                    joker_first: None,
                });
                let (phase, window) = match kind {
                    Power::Look => (Phase::Look, WindowKind::Look),
                    Power::Joker => (Phase::Joker, WindowKind::Joker),
                };
                self.set_phase(phase);
                self.open_window(window);
            }
            None => self.open_respond_window(),
        }
    }

    pub(super) fn finish_power(&mut self) {
        self.power = None;
        self.open_respond_window();
    }

    pub(super) fn handle_look_reveal(&mut self, slot: Slot) -> Result<(), CommandError> {
        self.require_phase("look_reveal", Phase::Look)?;
        let actor = self
            .power
            .map(|p| p.actor)
            .ok_or_else(|| self.wrong_phase("look_reveal"))?;
        let card = self.hands.at(slot)?;

        info!(viewer = %actor, seat = %slot.seat, index = slot.index, "look reveal");
        self.look_result = Some(LookReveal {
            viewer: actor,
            slot,
            card,
        });
        self.finish_power();
        Ok(())
    }

    pub(super) fn handle_joker_pick(&mut self, slot: Slot) -> Result<(), CommandError> {
        self.require_phase("joker_pick", Phase::Joker)?;
        let power = self.power.ok_or_else(|| self.wrong_phase("joker_pick"))?;
        self.hands.check(slot)?;

        match power.joker_first {
            None => {
                debug!(seat = %slot.seat, index = slot.index, "joker first pick");
                self.set_joker_first(Some(slot));
            }
            Some(first) if first == slot => {
                debug!(seat = %slot.seat, index = slot.index, "joker pick cancelled");
                self.set_joker_first(None);
            }
            Some(first) => {
                self.hands.swap(first, slot)?;
                info!(?first, second = ?slot, "joker swap");
                self.finish_power();
            }
        }
        Ok(())
    }

    fn set_joker_first(&mut self, pick: Option<Slot>) {
        if let Some(power) = self.power.as_mut() {
            power.joker_first = pick;
        }
    }
}
