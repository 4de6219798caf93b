//! # NPC Interaction
//!
//! A single dialogue with an NPC, driven by the server:
//!
//! ```text
//!                 NpcMessage            NpcChoice             NpcNumber
//!   Inactive ─┬─────────────► AwaitingAcknowledgement / AwaitingChoice / AwaitingNumber
//!             ▲                                   │
//!             └────────────── NpcClose ───────────┘
//! ```
//!
//! A shop listing answering a talk request opens the dialogue in
//! `AwaitingAcknowledgement`. Server messages may move between the three
//! waiting states freely. The
//! player's answers (acknowledge, choose, submit a number) are only valid in
//! the matching state; anything else is an [`InteractionError`].

use crate::error::{InteractionError, InteractionResult};
use crate::shop::ShopSession;
use mana_core::BeingId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NpcState {
    #[default]
    Inactive,
    AwaitingAcknowledgement,
    AwaitingChoice,
    AwaitingNumber,
}

/// Bounds and default of a number request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberRequest {
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

/// NPC dialogue state machine
///
/// # Invariant
/// `target` is `Some` exactly when `state` is not [`NpcState::Inactive`].
#[derive(Debug, Default)]
pub struct NpcInteraction {
    state: NpcState,
    target: Option<BeingId>,
    /// NPC we asked to talk to and have not heard back from
    requested: Option<BeingId>,
    message: String,
    choices: Vec<String>,
    number: NumberRequest,
    shop: ShopSession,
}

impl NpcInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> NpcState {
        self.state
    }

    #[inline]
    pub fn target(&self) -> Option<BeingId> {
        self.target
    }

    #[inline]
    pub fn requested(&self) -> Option<BeingId> {
        self.requested
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn number_request(&self) -> NumberRequest {
        self.number
    }

    pub fn shop(&self) -> &ShopSession {
        &self.shop
    }

    pub fn shop_mut(&mut self) -> &mut ShopSession {
        &mut self.shop
    }

    /// Whether `npc` is the NPC currently talked to or asked to talk
    pub fn involves(&self, npc: BeingId) -> bool {
        self.target == Some(npc) || self.requested == Some(npc)
    }

    //=== Player requests ===//

    /// Record a talk request
    ///
    /// Only allowed while no dialogue is running.
    pub fn request_talk(&mut self, npc: BeingId) -> InteractionResult<()> {
        self.expect_state(NpcState::Inactive)?;
        self.requested = Some(npc);
        Ok(())
    }

    /// Target of an acknowledgement
    pub fn acknowledge(&self) -> InteractionResult<BeingId> {
        self.require(NpcState::AwaitingAcknowledgement)
    }

    /// Target of a choice; `choice` is zero-based
    pub fn choose(&self, choice: usize) -> InteractionResult<BeingId> {
        let target = self.require(NpcState::AwaitingChoice)?;
        if choice >= self.choices.len() {
            return Err(InteractionError::ChoiceOutOfRange {
                choice,
                available: self.choices.len(),
            });
        }
        Ok(target)
    }

    /// Target of a number answer
    pub fn submit_number(&self, number: i32) -> InteractionResult<BeingId> {
        let target = self.require(NpcState::AwaitingNumber)?;
        let NumberRequest { min, max, .. } = self.number;
        if number < min || number > max {
            return Err(InteractionError::NumberOutOfRange { number, min, max });
        }
        Ok(target)
    }

    //=== Server transitions ===//

    pub fn on_message(&mut self, npc: BeingId, text: String) {
        self.message = text;
        self.enter(npc, NpcState::AwaitingAcknowledgement);
    }

    pub fn on_choices(&mut self, npc: BeingId, choices: Vec<String>) {
        self.choices = choices;
        self.enter(npc, NpcState::AwaitingChoice);
    }

    pub fn on_number_request(&mut self, npc: BeingId, request: NumberRequest) {
        self.number = request;
        self.enter(npc, NpcState::AwaitingNumber);
    }

    /// Bind a shop listing to the dialogue
    ///
    /// Accepted only from the NPC talked to or asked to talk. A listing
    /// answering a talk request starts the dialogue, waiting for an
    /// acknowledgement. Returns whether the listing was accepted.
    pub fn on_shop(&mut self, npc: BeingId) -> bool {
        if !self.involves(npc) {
            return false;
        }
        if self.state == NpcState::Inactive {
            self.enter(npc, NpcState::AwaitingAcknowledgement);
        }
        true
    }

    /// NPC to trade with, once a listing is open
    pub fn trade_target(&self) -> InteractionResult<BeingId> {
        self.shop.ensure_open()?;
        self.target.ok_or(InteractionError::NoTarget)
    }

    /// End the dialogue from any state; the shop closes with it
    pub fn close(&mut self) {
        self.state = NpcState::Inactive;
        self.target = None;
        self.requested = None;
        self.message.clear();
        self.choices.clear();
        self.number = NumberRequest::default();
        self.shop.close();
    }

    fn enter(&mut self, npc: BeingId, state: NpcState) {
        self.state = state;
        self.target = Some(npc);
        self.requested = None;
    }

    fn expect_state(&self, expected: NpcState) -> InteractionResult<()> {
        if self.state != expected {
            return Err(InteractionError::WrongState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn require(&self, expected: NpcState) -> InteractionResult<BeingId> {
        self.expect_state(expected)?;
        self.target.ok_or(InteractionError::NoTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::{ShopMode, TradedItem};
    use mana_core::ItemId;

    const NPC: BeingId = BeingId(12);

    #[test]
    fn test_talk_then_choices() {
        let mut npc = NpcInteraction::new();
        npc.request_talk(NPC).unwrap();
        assert_eq!(npc.state(), NpcState::Inactive);
        assert_eq!(npc.target(), None);

        npc.on_choices(NPC, vec!["Yes".into(), "No".into()]);
        assert_eq!(npc.state(), NpcState::AwaitingChoice);
        assert_eq!(npc.target(), Some(NPC));
        assert_eq!(npc.requested(), None);
        assert_eq!(npc.choose(1).unwrap(), NPC);
    }

    #[test]
    fn test_close_from_every_state() {
        let transitions: [fn(&mut NpcInteraction); 3] = [
            |n| n.on_message(NPC, "hi".into()),
            |n| n.on_choices(NPC, vec!["a".into()]),
            |n| n.on_number_request(NPC, NumberRequest { min: 0, max: 9, default: 1 }),
        ];
        for enter in transitions {
            let mut npc = NpcInteraction::new();
            enter(&mut npc);
            assert_ne!(npc.state(), NpcState::Inactive);
            npc.close();
            assert_eq!(npc.state(), NpcState::Inactive);
            assert_eq!(npc.target(), None);
        }
    }

    #[test]
    fn test_answers_outside_matching_state_are_errors() {
        let mut npc = NpcInteraction::new();
        assert!(matches!(
            npc.acknowledge(),
            Err(InteractionError::WrongState { expected: NpcState::AwaitingAcknowledgement, actual: NpcState::Inactive })
        ));

        npc.on_message(NPC, "Hello".into());
        assert_eq!(npc.acknowledge().unwrap(), NPC);
        assert!(matches!(npc.choose(0), Err(InteractionError::WrongState { .. })));
        assert!(matches!(npc.submit_number(1), Err(InteractionError::WrongState { .. })));
    }

    #[test]
    fn test_choice_bounds() {
        let mut npc = NpcInteraction::new();
        npc.on_choices(NPC, vec!["only".into()]);
        assert!(matches!(
            npc.choose(1),
            Err(InteractionError::ChoiceOutOfRange { choice: 1, available: 1 })
        ));
    }

    #[test]
    fn test_number_bounds() {
        let mut npc = NpcInteraction::new();
        npc.on_number_request(NPC, NumberRequest { min: 1, max: 10, default: 5 });
        assert_eq!(npc.submit_number(10).unwrap(), NPC);
        assert!(matches!(npc.submit_number(11), Err(InteractionError::NumberOutOfRange { .. })));
    }

    #[test]
    fn test_talk_refused_during_dialogue() {
        let mut npc = NpcInteraction::new();
        npc.on_message(NPC, "busy".into());
        assert!(matches!(npc.request_talk(BeingId::new(3)), Err(InteractionError::WrongState { .. })));
    }

    #[test]
    fn test_close_ends_shop() {
        let mut npc = NpcInteraction::new();
        npc.on_message(NPC, "Buy something".into());
        npc.shop_mut().open(
            ShopMode::Selling,
            vec![TradedItem { item: ItemId::new(1), amount: 1, cost: 1 }],
        );
        npc.close();
        assert!(!npc.shop().is_open());
    }

    #[test]
    fn test_listing_answers_talk_request() {
        let mut npc = NpcInteraction::new();
        npc.request_talk(NPC).unwrap();
        assert!(npc.on_shop(NPC));
        assert_eq!(npc.state(), NpcState::AwaitingAcknowledgement);
        assert_eq!(npc.target(), Some(NPC));
        assert_eq!(npc.requested(), None);

        assert!(!npc.on_shop(BeingId::new(3)));
        assert!(matches!(npc.request_talk(BeingId::new(3)), Err(InteractionError::WrongState { .. })));
    }

    #[test]
    fn test_trade_needs_open_listing() {
        let mut npc = NpcInteraction::new();
        assert!(matches!(npc.trade_target(), Err(InteractionError::ShopClosed)));

        npc.request_talk(NPC).unwrap();
        npc.on_shop(NPC);
        npc.shop_mut().open(
            ShopMode::Buying,
            vec![TradedItem { item: ItemId::new(1), amount: 1, cost: 1 }],
        );
        assert_eq!(npc.trade_target().unwrap(), NPC);
    }
}
