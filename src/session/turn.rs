//! Turn engine: draw, then resolve.
//!
//! The seat on turn draws one card (deck head or discard top), then either
//! discards it or swaps it into a hand slot. Whatever lands on the discard
//! pile starts the post-play flow: an optional power window, then a respond
//! window.

use tracing::debug;

use super::state::{GameSession, Phase, RespondState, TurnStep};
use super::window::Clock;
use crate::cards::{Rank, Slot};
use crate::core::{Command, CommandError, SeatId};

impl<C: Clock> GameSession<C> {
    pub fn draw_from_deck(&mut self) -> Result<(), CommandError> {
        self.apply(Command::DrawFromDeck)
    }

    pub fn draw_from_discard(&mut self) -> Result<(), CommandError> {
        self.apply(Command::DrawFromDiscard)
    }

    pub fn resolve_by_discard(&mut self) -> Result<(), CommandError> {
        self.apply(Command::ResolveByDiscard)
    }

    pub fn resolve_by_swap(&mut self, seat: SeatId, index: usize) -> Result<(), CommandError> {
        self.apply(Command::ResolveBySwap { seat, index })
    }

    /// Whether the next draw is the game's opening draw, which must come
    /// from the deck.
    #[must_use]
    pub fn opening_draw_restricted(&self) -> bool {
        self.phase == Phase::Turn
            && !self.opening_turn_complete
            && self.turn_seat == self.config.turn_order.first()
    }

    pub(super) fn begin_first_turn(&mut self) {
        self.turn_seat = self.config.turn_order.first();
        self.turn_step = TurnStep::Draw;
        self.drawn = None;
        self.opening_turn_complete = false;
        self.declarer = None;
        self.set_phase(Phase::Turn);
    }

    pub(super) fn begin_turn(&mut self, seat: SeatId) {
        self.turn_seat = seat;
        self.turn_step = TurnStep::Draw;
        self.drawn = None;
        self.set_phase(Phase::Turn);
    }

    fn check_can_draw(&self, command: &'static str) -> Result<(), CommandError> {
        self.require_phase(command, Phase::Turn)?;
        if self.drawn.is_some() {
            return Err(CommandError::AlreadyPending);
        }
        Ok(())
    }

    pub(super) fn handle_draw_from_deck(&mut self) -> Result<(), CommandError> {
        self.check_can_draw("draw_from_deck")?;
        let card = self.deck.draw()?;
        debug!(seat = %self.turn_seat, %card, "drew from deck");
        self.drawn = Some(card);
        self.turn_step = TurnStep::Resolve;
        Ok(())
    }

    pub(super) fn handle_draw_from_discard(&mut self) -> Result<(), CommandError> {
        self.check_can_draw("draw_from_discard")?;
        if self.opening_draw_restricted() {
            return Err(CommandError::OpeningDrawRestricted);
        }
        let card = self.pile.take_top().ok_or(CommandError::DiscardEmpty)?;
        debug!(seat = %self.turn_seat, %card, "drew from discard");
        self.drawn = Some(card);
        self.turn_step = TurnStep::Resolve;
        Ok(())
    }

    pub(super) fn handle_resolve_by_discard(&mut self) -> Result<(), CommandError> {
        self.require_phase("resolve_by_discard", Phase::Turn)?;
        let card = self.drawn.take().ok_or_else(|| self.wrong_phase("resolve_by_discard"))?;

        self.pile.discard(card);
        self.turn_step = TurnStep::Draw;
        debug!(seat = %self.turn_seat, %card, "discarded drawn card");
        self.begin_post_play(self.turn_seat, card.rank);
        Ok(())
    }

    pub(super) fn handle_resolve_by_swap(&mut self, slot: Slot) -> Result<(), CommandError> {
        self.require_phase("resolve_by_swap", Phase::Turn)?;
        let drawn = self.drawn.ok_or_else(|| self.wrong_phase("resolve_by_swap"))?;
        if slot.seat != self.turn_seat {
            return Err(CommandError::NotYourTurn {
                expected: self.turn_seat,
                actual: slot.seat,
            });
        }

        let displaced = self.hands.replace(slot, drawn)?;
        self.drawn = None;
        self.pile.discard(displaced);
        self.turn_step = TurnStep::Draw;
        debug!(seat = %self.turn_seat, index = slot.index, %displaced, "swapped drawn card into hand");
        self.begin_post_play(self.turn_seat, displaced.rank);
        Ok(())
    }

    /// A card of `rank` just went onto the pile from `played_by`'s turn.
    ///
    /// The seat that receives the next turn is fixed here and is not
    /// revisited when responses restart the window.
    fn begin_post_play(&mut self, played_by: SeatId, rank: Rank) {
        self.opening_turn_complete = true;
        self.look_result = None;
        self.respond = Some(RespondState::opened_by(
            &self.config.turn_order,
            played_by,
            rank,
            false,
        ));
        self.pending_next_turn = self.config.turn_order.next_after(played_by);
        self.trigger_power_or_respond(played_by, rank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Deck, Suit};
    use crate::core::SessionConfig;
    use crate::session::ManualClock;

    /// Session past the peek stage, on seat 0's opening turn.
    fn on_first_turn() -> GameSession<ManualClock> {
        let mut session =
            GameSession::with_clock(SessionConfig::default(), Some(11), ManualClock::new()).unwrap();
        session.deal_all().unwrap();
        while session.phase() == Phase::Peek {
            let generation = session.active_window().unwrap().generation;
            session.apply(Command::Expire { generation }).unwrap();
        }
        session
    }

    #[test]
    fn test_draw_from_deck_moves_to_resolve() {
        let mut session = on_first_turn();
        let head = session.deck().cards()[0];

        session.draw_from_deck().unwrap();
        assert_eq!(session.drawn_card(), Some(head));
        assert_eq!(session.turn_step(), TurnStep::Resolve);
        assert!(session.check_conservation());
    }

    #[test]
    fn test_second_draw_is_already_pending() {
        let mut session = on_first_turn();
        session.draw_from_deck().unwrap();

        assert_eq!(session.draw_from_deck(), Err(CommandError::AlreadyPending));
        assert_eq!(session.draw_from_discard(), Err(CommandError::AlreadyPending));
    }

    #[test]
    fn test_opening_draw_must_use_deck() {
        let mut session = on_first_turn();
        // Even with a card on the pile the opening seat may not take it.
        session.pile.discard(session.deck.draw().unwrap());

        assert!(session.opening_draw_restricted());
        assert_eq!(session.draw_from_discard(), Err(CommandError::OpeningDrawRestricted));
        assert!(session.draw_from_deck().is_ok());
    }

    #[test]
    fn test_resolve_without_draw_is_rejected() {
        let mut session = on_first_turn();
        assert!(matches!(
            session.resolve_by_discard(),
            Err(CommandError::InvalidPhaseForCommand { command: "resolve_by_discard", .. })
        ));
        assert!(matches!(
            session.resolve_by_swap(SeatId::new(0), 0),
            Err(CommandError::InvalidPhaseForCommand { command: "resolve_by_swap", .. })
        ));
    }

    #[test]
    fn test_swap_checks_seat_and_slot() {
        let mut session = on_first_turn();
        session.draw_from_deck().unwrap();

        assert_eq!(
            session.resolve_by_swap(SeatId::new(1), 0),
            Err(CommandError::NotYourTurn { expected: SeatId::new(0), actual: SeatId::new(1) })
        );
        assert!(matches!(
            session.resolve_by_swap(SeatId::new(0), 9),
            Err(CommandError::SlotOutOfRange { index: 9, .. })
        ));
        assert!(session.drawn_card().is_some());
    }

    #[test]
    fn test_swap_discards_displaced_card() {
        let mut session = on_first_turn();
        let seat = SeatId::new(0);
        let old = session.hands().at(Slot::new(seat, 2)).unwrap();
        session.draw_from_deck().unwrap();
        let drawn = session.drawn_card().unwrap();

        session.resolve_by_swap(seat, 2).unwrap();

        assert_eq!(session.hands().at(Slot::new(seat, 2)), Ok(drawn));
        assert_eq!(session.discard_pile().top(), Some(&old));
        assert!(session.drawn_card().is_none());
        assert_eq!(session.respond_state().unwrap().target, old.rank);
        assert!(session.check_conservation());
    }

    #[test]
    fn test_empty_deck_draw() {
        // Deal from a deck whose layout we control, then drain it.
        let deck = Deck::standard();
        let mut session =
            GameSession::from_deck(SessionConfig::default(), deck, ManualClock::new()).unwrap();
        session.deal_all().unwrap();
        while session.phase() == Phase::Peek {
            let generation = session.active_window().unwrap().generation;
            session.apply(Command::Expire { generation }).unwrap();
        }
        let rest = session.deck.draw_up_to(52);
        assert_eq!(session.draw_from_deck(), Err(CommandError::DeckEmpty));

        // Put the cards back so the invariant still holds for the other assertions.
        session.deck = Deck::from_cards(rest);
        assert!(session.check_conservation());
        assert_eq!(Card::new(Rank::Ace, Suit::Spades), session.hands().at(Slot::new(SeatId::new(0), 0)).unwrap());
    }
}
