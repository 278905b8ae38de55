use crate::{Card, ProbabilityResult, Selection, SlotRef};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotView {
    pub slot: SlotRef,
    pub card: Option<Card>,
    pub editing: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GridEntry {
    pub card: Card,
    pub selectable: bool,
}

/// Everything a renderer needs to draw one frame of the board.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardView {
    pub hand: Vec<SlotView>,
    pub table: Vec<SlotView>,
    pub grid: Vec<GridEntry>,
    pub cursor: Option<SlotRef>,
    pub result: ProbabilityResult,
    pub result_label: Option<String>,
    pub stale: bool,
    pub pending: bool,
    pub can_calculate: bool,
}

impl Selection {
    pub fn view(&self) -> BoardView {
        let slot_view = |slot: SlotRef| SlotView {
            slot,
            card: self.slot(slot),
            editing: self.cursor() == Some(slot),
        };
        let (hand, table): (Vec<_>, Vec<_>) = SlotRef::all()
            .map(slot_view)
            .partition(|view| view.slot.group == crate::SlotGroup::Hand);
        let grid = Card::full_deck()
            .into_iter()
            .map(|card| GridEntry {
                card,
                selectable: self.is_selectable(card),
            })
            .collect();
        BoardView {
            hand,
            table,
            grid,
            cursor: self.cursor(),
            result: self.result(),
            result_label: self.result().label(),
            stale: self.result_is_stale(),
            pending: self.pending(),
            can_calculate: self.hand_complete(),
        }
    }
}
