use crate::{
    Card, ProbabilityRequest, ProbabilityResult, SlotGroup, SlotRef, HAND_SLOTS, TABLE_SLOTS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("slot {0} out of range")]
    SlotOutOfRange(SlotRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Placed {
        slot: SlotRef,
        replaced: Option<Card>,
    },
    IgnoredDuplicate,
    IgnoredNoCursor,
}

impl PickOutcome {
    pub fn placed(&self) -> bool {
        matches!(self, PickOutcome::Placed { .. })
    }
}

/// Generation tag of an issued probability request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Slots {
    hand: [Option<Card>; HAND_SLOTS],
    table: [Option<Card>; TABLE_SLOTS],
}

/// Hand and table slots for one session, with the edit cursor and the last
/// probability result.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    slots: Slots,
    cursor: Option<SlotRef>,
    result: ProbabilityResult,
    result_for: Option<Slots>,
    generation: u64,
    in_flight: Option<(RequestTicket, Slots)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self) -> &[Option<Card>; HAND_SLOTS] {
        &self.slots.hand
    }

    pub fn table(&self) -> &[Option<Card>; TABLE_SLOTS] {
        &self.slots.table
    }

    pub fn slot(&self, slot: SlotRef) -> Option<Card> {
        match slot.group {
            SlotGroup::Hand => self.slots.hand.get(slot.index).copied().flatten(),
            SlotGroup::Table => self.slots.table.get(slot.index).copied().flatten(),
        }
    }

    pub fn cursor(&self) -> Option<SlotRef> {
        self.cursor
    }

    pub fn result(&self) -> ProbabilityResult {
        self.result
    }

    /// Points the cursor at `slot`. Any pending cursor is dropped.
    pub fn begin_edit(&mut self, slot: SlotRef) -> Result<(), SelectionError> {
        if !slot.is_valid() {
            return Err(SelectionError::SlotOutOfRange(slot));
        }
        self.cursor = Some(slot);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.cursor = None;
    }

    /// Places `card` in the cursor slot. Duplicates and picks without a
    /// cursor change nothing; a duplicate pick keeps the cursor pending.
    pub fn pick(&mut self, card: Card) -> PickOutcome {
        if !self.is_selectable(card) {
            return PickOutcome::IgnoredDuplicate;
        }
        let Some(slot) = self.cursor.take() else {
            return PickOutcome::IgnoredNoCursor;
        };
        let target = match slot.group {
            SlotGroup::Hand => &mut self.slots.hand[slot.index],
            SlotGroup::Table => &mut self.slots.table[slot.index],
        };
        let replaced = target.replace(card);
        PickOutcome::Placed { slot, replaced }
    }

    pub fn reset(&mut self) {
        self.slots = Slots::default();
        self.cursor = None;
        self.result = ProbabilityResult::None;
        self.result_for = None;
        self.generation += 1;
        self.in_flight = None;
    }

    pub fn is_selectable(&self, card: Card) -> bool {
        self.cards().all(|held| held != card)
    }

    /// Cards currently held by any slot.
    pub fn selected(&self) -> HashSet<Card> {
        self.cards().collect()
    }

    pub fn hand_complete(&self) -> bool {
        self.slots.hand.iter().all(Option::is_some)
    }

    pub fn filled_count(&self) -> usize {
        self.cards().count()
    }

    /// Snapshots the slots into a request and makes it the only one whose
    /// result will be accepted.
    pub fn issue_request(&mut self, num_opponents: u32) -> (RequestTicket, ProbabilityRequest) {
        self.generation += 1;
        let ticket = RequestTicket(self.generation);
        self.in_flight = Some((ticket, self.slots));
        let request =
            ProbabilityRequest::from_slots(&self.slots.hand, &self.slots.table, num_opponents);
        (ticket, request)
    }

    /// Stores `result` if `ticket` is the latest issued request. Returns
    /// whether it was applied.
    pub fn apply_result(&mut self, ticket: RequestTicket, result: ProbabilityResult) -> bool {
        match self.in_flight {
            Some((latest, requested)) if latest == ticket => {
                self.result = result;
                self.result_for = Some(requested);
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_ticket(&self) -> Option<RequestTicket> {
        self.in_flight.map(|(ticket, _)| ticket)
    }

    /// True when a result is shown but the slots have changed since the
    /// request that produced it.
    pub fn result_is_stale(&self) -> bool {
        match self.result_for {
            Some(requested) => !self.result.is_none() && requested != self.slots,
            None => false,
        }
    }

    fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.slots
            .hand
            .iter()
            .chain(self.slots.table.iter())
            .flatten()
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(text: &str) -> Card {
        text.parse().expect("card")
    }

    fn place(selection: &mut Selection, slot: SlotRef, text: &str) {
        selection.begin_edit(slot).expect("valid slot");
        assert!(selection.pick(card(text)).placed());
    }

    #[test]
    fn pick_fills_cursor_slot_and_clears_cursor() {
        let mut selection = Selection::new();
        selection.begin_edit(SlotRef::hand(0)).expect("slot");
        let outcome = selection.pick(card("Ah"));
        assert_eq!(
            outcome,
            PickOutcome::Placed {
                slot: SlotRef::hand(0),
                replaced: None
            }
        );
        assert_eq!(selection.hand(), &[Some(card("Ah")), None]);
        assert_eq!(selection.cursor(), None);
        assert!(!selection.is_selectable(card("Ah")));
        assert!(selection.is_selectable(card("Kd")));
    }

    #[test]
    fn pick_without_cursor_is_ignored() {
        let mut selection = Selection::new();
        assert_eq!(selection.pick(card("Ah")), PickOutcome::IgnoredNoCursor);
        assert_eq!(selection.filled_count(), 0);
    }

    #[test]
    fn duplicate_pick_is_ignored() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        place(&mut selection, SlotRef::hand(1), "Kd");
        selection.begin_edit(SlotRef::table(2)).expect("slot");
        assert_eq!(selection.pick(card("Ah")), PickOutcome::IgnoredDuplicate);
        assert_eq!(selection.table(), &[None; TABLE_SLOTS]);
        assert_eq!(selection.hand(), &[Some(card("Ah")), Some(card("Kd"))]);
        assert_eq!(selection.cursor(), Some(SlotRef::table(2)));
    }

    #[test]
    fn repicking_a_filled_slot_overwrites_it() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        selection.begin_edit(SlotRef::hand(0)).expect("slot");
        assert_eq!(
            selection.pick(card("Qs")),
            PickOutcome::Placed {
                slot: SlotRef::hand(0),
                replaced: Some(card("Ah"))
            }
        );
        assert!(selection.is_selectable(card("Ah")));
        assert_eq!(selection.selected().len(), 1);
    }

    #[test]
    fn later_begin_edit_wins() {
        let mut selection = Selection::new();
        selection.begin_edit(SlotRef::hand(1)).expect("slot");
        selection.begin_edit(SlotRef::table(3)).expect("slot");
        selection.pick(card("9c"));
        assert_eq!(selection.hand(), &[None, None]);
        assert_eq!(selection.slot(SlotRef::table(3)), Some(card("9c")));
    }

    #[test]
    fn out_of_range_slot_is_rejected_without_touching_state() {
        let mut selection = Selection::new();
        selection.begin_edit(SlotRef::hand(1)).expect("slot");
        assert_eq!(
            selection.begin_edit(SlotRef::table(5)),
            Err(SelectionError::SlotOutOfRange(SlotRef::table(5)))
        );
        assert_eq!(selection.cursor(), Some(SlotRef::hand(1)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        place(&mut selection, SlotRef::table(4), "2c");
        let (ticket, _) = selection.issue_request(2);
        selection.apply_result(ticket, ProbabilityResult::Value(0.5));
        selection.begin_edit(SlotRef::hand(1)).expect("slot");

        selection.reset();
        assert_eq!(selection.hand(), &[None; HAND_SLOTS]);
        assert_eq!(selection.table(), &[None; TABLE_SLOTS]);
        assert_eq!(selection.cursor(), None);
        assert_eq!(selection.result(), ProbabilityResult::None);
        assert!(!selection.result_is_stale());
    }

    #[test]
    fn issued_request_snapshots_slots() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        place(&mut selection, SlotRef::hand(1), "Kd");
        place(&mut selection, SlotRef::table(0), "2c");
        place(&mut selection, SlotRef::table(1), "7s");
        let (_, request) = selection.issue_request(2);
        assert_eq!(request.hand, vec![card("Ah"), card("Kd")]);
        assert_eq!(request.table, vec![card("2c"), card("7s")]);
        assert_eq!(request.num_opponents, 2);
        assert!(selection.pending());
    }

    #[test]
    fn only_latest_ticket_is_applied() {
        let mut selection = Selection::new();
        let (first, _) = selection.issue_request(2);
        let (second, _) = selection.issue_request(2);
        assert!(first < second);

        assert!(!selection.apply_result(first, ProbabilityResult::Value(0.1)));
        assert_eq!(selection.result(), ProbabilityResult::None);
        assert!(selection.apply_result(second, ProbabilityResult::Value(0.7)));
        assert_eq!(selection.result(), ProbabilityResult::Value(0.7));
        assert!(!selection.pending());
        assert!(!selection.apply_result(second, ProbabilityResult::Error));
        assert_eq!(selection.result(), ProbabilityResult::Value(0.7));
    }

    #[test]
    fn reset_invalidates_outstanding_ticket() {
        let mut selection = Selection::new();
        let (ticket, _) = selection.issue_request(2);
        selection.reset();
        assert!(!selection.pending());
        assert!(!selection.apply_result(ticket, ProbabilityResult::Value(0.4)));
        assert_eq!(selection.result(), ProbabilityResult::None);
        let (next, _) = selection.issue_request(2);
        assert!(next > ticket);
    }

    #[test]
    fn result_goes_stale_when_slots_change() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        place(&mut selection, SlotRef::hand(1), "Kd");
        let (ticket, _) = selection.issue_request(2);
        assert!(selection.apply_result(ticket, ProbabilityResult::Value(0.62)));
        assert!(!selection.result_is_stale());

        place(&mut selection, SlotRef::table(0), "5h");
        assert!(selection.result_is_stale());
        assert_eq!(selection.result(), ProbabilityResult::Value(0.62));
    }

    #[test]
    fn result_is_judged_against_issue_time_slots() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(0), "Ah");
        let (ticket, _) = selection.issue_request(2);
        place(&mut selection, SlotRef::hand(1), "Kd");
        assert!(selection.apply_result(ticket, ProbabilityResult::Value(0.3)));
        assert!(selection.result_is_stale());
    }

    #[test]
    fn hand_complete_needs_both_hand_slots() {
        let mut selection = Selection::new();
        place(&mut selection, SlotRef::hand(1), "Ah");
        place(&mut selection, SlotRef::table(0), "Kd");
        assert!(!selection.hand_complete());
        place(&mut selection, SlotRef::hand(0), "Qd");
        assert!(selection.hand_complete());
    }
}
