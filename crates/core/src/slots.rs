use serde::{Deserialize, Serialize};
use std::fmt;

pub const HAND_SLOTS: usize = 2;
pub const TABLE_SLOTS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SlotGroup {
    Hand,
    Table,
}

impl SlotGroup {
    pub fn len(self) -> usize {
        match self {
            SlotGroup::Hand => HAND_SLOTS,
            SlotGroup::Table => TABLE_SLOTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SlotGroup::Hand => "hand",
            SlotGroup::Table => "table",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hand" | "h" => Some(SlotGroup::Hand),
            "table" | "t" | "board" => Some(SlotGroup::Table),
            _ => None,
        }
    }
}

/// A position in either slot group. Construction does not check the index;
/// the controller does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub group: SlotGroup,
    pub index: usize,
}

impl SlotRef {
    pub const fn hand(index: usize) -> Self {
        Self {
            group: SlotGroup::Hand,
            index,
        }
    }

    pub const fn table(index: usize) -> Self {
        Self {
            group: SlotGroup::Table,
            index,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.index < self.group.len()
    }

    /// Every valid slot: hand first, then table, each in index order.
    pub fn all() -> impl Iterator<Item = SlotRef> {
        (0..HAND_SLOTS)
            .map(SlotRef::hand)
            .chain((0..TABLE_SLOTS).map(SlotRef::table))
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.group.label(), self.index)
    }
}
