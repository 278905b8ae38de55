use oddsboard_client::{Dispatcher, EngineConfig};
use oddsboard_core::{
    Card, PickOutcome, ProbabilityResult, Rank, Selection, SlotRef, Suit, HAND_SLOTS,
};
use std::collections::VecDeque;

const MAX_EVENT_LOG: usize = 200;
pub const GRID_ROWS: usize = Suit::ALL.len();
pub const GRID_COLS: usize = Rank::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Slots,
    Grid,
    Events,
}

pub struct App {
    pub selection: Selection,
    pub config: EngineConfig,
    dispatcher: Dispatcher,
    pub focus: FocusPane,
    pub slot_cursor: usize,
    pub grid_row: usize,
    pub grid_col: usize,
    pub event_log: VecDeque<String>,
    /// Lines scrolled back from the newest event; 0 follows the tail.
    pub event_scroll: usize,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, dispatcher: Dispatcher) -> Self {
        let mut app = Self {
            selection: Selection::new(),
            config,
            dispatcher,
            focus: FocusPane::Slots,
            slot_cursor: 0,
            grid_row: 0,
            grid_col: 0,
            event_log: VecDeque::new(),
            event_scroll: 0,
            status_line: "ready".to_string(),
            show_help: false,
            should_quit: false,
        };
        let endpoint = app.config.endpoint.clone();
        app.push_event_line(format!(
            "engine {} ({} opponents)",
            endpoint, app.config.num_opponents
        ));
        app
    }

    /// Applies finished probability requests.
    pub fn on_tick(&mut self) {
        for result in self.dispatcher.drain_into(&mut self.selection) {
            let line = match result {
                ProbabilityResult::Value(_) => format!("winning probability {result}"),
                ProbabilityResult::Error => "probability request failed".to_string(),
                ProbabilityResult::None => continue,
            };
            self.push_status(line.clone());
            self.push_event_line(line);
        }
    }

    pub fn focus_label(&self, pane: FocusPane) -> &'static str {
        match pane {
            FocusPane::Slots => "Slots",
            FocusPane::Grid => "Cards",
            FocusPane::Events => "Events",
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = match (self.focus, forward) {
            (FocusPane::Slots, true) => FocusPane::Grid,
            (FocusPane::Grid, true) => FocusPane::Events,
            (FocusPane::Events, true) => FocusPane::Slots,
            (FocusPane::Slots, false) => FocusPane::Events,
            (FocusPane::Grid, false) => FocusPane::Slots,
            (FocusPane::Events, false) => FocusPane::Grid,
        };
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        match self.focus {
            FocusPane::Slots => {
                let total = SlotRef::all().count();
                move_index(&mut self.slot_cursor, total, dx + dy);
            }
            FocusPane::Grid => {
                move_index(&mut self.grid_col, GRID_COLS, dx);
                move_index(&mut self.grid_row, GRID_ROWS, dy);
            }
            FocusPane::Events => {
                let max = self.event_log.len().saturating_sub(1);
                self.event_scroll = if dy < 0 {
                    (self.event_scroll + dy.unsigned_abs()).min(max)
                } else {
                    self.event_scroll.saturating_sub(dy as usize)
                };
            }
        }
    }

    /// Event lines visible in a pane `capacity` lines tall, honouring the scroll.
    pub fn visible_events(&self, capacity: usize) -> impl Iterator<Item = &String> {
        let end = self.event_log.len().saturating_sub(self.event_scroll);
        let start = end.saturating_sub(capacity);
        self.event_log.range(start..end)
    }

    pub fn cursor_card(&self) -> Card {
        Card::new(Rank::ALL[self.grid_col], Suit::ALL[self.grid_row])
    }

    pub fn next_hint(&self) -> String {
        if self.selection.pending() {
            return "waiting for the engine".to_string();
        }
        if let Some(slot) = self.selection.cursor() {
            return format!("pick a card for {slot}");
        }
        if !self.selection.hand_complete() {
            return "choose both hand cards".to_string();
        }
        "press c to calculate".to_string()
    }

    pub fn activate_primary(&mut self) {
        match self.focus {
            FocusPane::Slots => self.edit_slot(self.slot_cursor),
            FocusPane::Grid => self.pick_card(self.cursor_card()),
            FocusPane::Events => {}
        }
    }

    /// Targets the slot at `position` (hand slots first) and moves focus to
    /// the card grid.
    pub fn edit_slot(&mut self, position: usize) {
        let slot = slot_at(position);
        match self.selection.begin_edit(slot) {
            Ok(()) => {
                self.slot_cursor = position;
                self.focus = FocusPane::Grid;
                self.push_status(format!("editing {slot}"));
            }
            Err(err) => self.push_status(err.to_string()),
        }
    }

    pub fn pick_card(&mut self, card: Card) {
        if let PickOutcome::Placed { slot, replaced } = self.selection.pick(card) {
            let line = match replaced {
                Some(old) => format!("{slot}: {old} -> {card}"),
                None => format!("{slot}: {card}"),
            };
            self.push_event_line(line.clone());
            self.push_status(line);
            self.focus = FocusPane::Slots;
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.selection.cursor().is_some() {
            self.selection.cancel_edit();
            self.focus = FocusPane::Slots;
            self.push_status("edit cancelled");
        }
    }

    pub fn calculate(&mut self) {
        if !self.selection.hand_complete() {
            self.push_status("pick both hand cards first");
            return;
        }
        let ticket = self
            .dispatcher
            .submit_from(&mut self.selection, self.config.num_opponents);
        self.push_event_line(format!("request #{} sent", ticket.0));
        self.push_status("calculating...");
    }

    pub fn reset(&mut self) {
        self.selection.reset();
        self.focus = FocusPane::Slots;
        self.slot_cursor = 0;
        self.push_event_line("board reset".to_string());
        self.push_status("ready");
    }

    pub fn result_line(&self) -> String {
        let mut line = match self.selection.result().label() {
            Some(label) => format!("Winning Probability: {label}"),
            None => "Winning Probability: -".to_string(),
        };
        if self.selection.result_is_stale() {
            line.push_str(" (stale)");
        }
        if self.selection.pending() {
            line.push_str(" [calculating]");
        }
        line
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        if self.event_scroll > 0 {
            self.event_scroll += 1;
        }
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
        self.event_scroll = self.event_scroll.min(self.event_log.len().saturating_sub(1));
    }
}

/// Slot at a flat position: hand slots first, then table slots.
pub fn slot_at(position: usize) -> SlotRef {
    if position < HAND_SLOTS {
        SlotRef::hand(position)
    } else {
        SlotRef::table(position - HAND_SLOTS)
    }
}

fn move_index(value: &mut usize, len: usize, delta: isize) {
    if len == 0 || delta == 0 {
        return;
    }
    let len = len as isize;
    let next = (*value as isize + delta).rem_euclid(len);
    *value = next as usize;
}
