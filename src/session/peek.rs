//! Dealing and the peek stage.
//!
//! After the deal, each seat in turn order gets one timed window to reveal up
//! to `peek_limit` distinct slots of its own hand. Reveals are visible only
//! while that window is open and never change card state.

use tracing::debug;

use super::state::{GameSession, Phase};
use super::window::{Clock, WindowKind};
use crate::cards::Slot;
use crate::core::{Command, CommandError, SeatId};

impl<C: Clock> GameSession<C> {
    /// Deal the opening hands round-robin and open the first peek window.
    pub fn deal_all(&mut self) -> Result<(), CommandError> {
        self.apply(Command::DealAll)
    }

    /// Reveal slot `index` of the peeking seat's own hand.
    pub fn peek_reveal(&mut self, seat: SeatId, index: usize) -> Result<(), CommandError> {
        self.apply(Command::PeekReveal { seat, index })
    }

    pub(super) fn handle_deal_all(&mut self) -> Result<(), CommandError> {
        self.require_phase("deal_all", Phase::Init)?;
        self.set_phase(Phase::Dealing);

        let order = self.config.turn_order;
        for _ in 0..self.config.hand_size {
            for &seat in order.seats() {
                // Config validation guarantees the deck covers every hand.
                let card = self.deck.draw()?;
                self.hands.append(seat, [card]);
            }
        }

        self.set_phase(Phase::Dealt);
        self.open_peek_for(order.first());
        Ok(())
    }

    fn open_peek_for(&mut self, seat: SeatId) {
        if self.phase != Phase::Peek {
            self.set_phase(Phase::Peek);
        }
        self.peek_seat = Some(seat);
        self.peek_revealed.clear();
        self.open_window(WindowKind::Peek);
    }

    pub(super) fn handle_peek_reveal(&mut self, slot: Slot) -> Result<(), CommandError> {
        self.require_phase("peek_reveal", Phase::Peek)?;
        let active = self.peek_seat.ok_or_else(|| self.wrong_phase("peek_reveal"))?;
        if slot.seat != active {
            return Err(CommandError::NotYourTurn {
                expected: active,
                actual: slot.seat,
            });
        }
        self.hands.check(slot)?;

        if self.peek_revealed.contains(&slot.index) {
            return Ok(());
        }
        if self.peek_revealed.len() >= self.config.peek_limit {
            return Err(CommandError::RevealLimitReached {
                limit: self.config.peek_limit,
            });
        }
        self.peek_revealed.push(slot.index);
        debug!(seat = %slot.seat, index = slot.index, "peeked");
        Ok(())
    }

    pub(super) fn peek_expired(&mut self) {
        let order = self.config.turn_order;
        let next = self
            .peek_seat
            .and_then(|seat| order.position_of(seat))
            .map(|pos| pos + 1)
            .and_then(|pos| order.seats().get(pos).copied());

        match next {
            Some(seat) => self.open_peek_for(seat),
            None => {
                self.peek_seat = None;
                self.peek_revealed.clear();
                self.set_phase(Phase::PeekDone);
                self.begin_first_turn();
            }
        }
    }
}
