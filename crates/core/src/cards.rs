use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// Grid row order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn code(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            'c' => Some(Suit::Clubs),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Grid column order, low to high.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let rank = match code.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return None,
        };
        Some(rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("empty card")]
    Empty,
    #[error("unknown rank '{0}'")]
    UnknownRank(String),
    #[error("unknown suit '{0}'")]
    UnknownSuit(char),
}

/// A playing card. Its wire identity is `<rank><suit>`, e.g. `Ah` or `10h`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// All 52 cards in grid order: one row per suit, ranks ascending.
    pub fn full_deck() -> Vec<Card> {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        cards
    }

    pub fn identity(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let Some(suit_char) = value.chars().last() else {
            return Err(CardParseError::Empty);
        };
        let suit = Suit::from_code(suit_char).ok_or(CardParseError::UnknownSuit(suit_char))?;
        let rank_text = &value[..value.len() - suit_char.len_utf8()];
        let rank = Rank::from_code(rank_text)
            .ok_or_else(|| CardParseError::UnknownRank(rank_text.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn full_deck_has_52_distinct_cards_in_grid_order() {
        let deck = Card::full_deck();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 52);
        assert_eq!(deck[0].to_string(), "2h");
        assert_eq!(deck[12].to_string(), "Ah");
        assert_eq!(deck[13].to_string(), "2d");
        assert_eq!(deck[51].to_string(), "As");
    }

    #[test]
    fn parses_canonical_and_alias_forms() {
        assert_eq!("Ah".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Hearts)));
        assert_eq!("10h".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("Ts".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Spades)));
        assert_eq!("kd".parse::<Card>(), Ok(Card::new(Rank::King, Suit::Diamonds)));
        assert_eq!("tS".parse::<Card>().map(|c| c.to_string()), Ok("10s".to_string()));
    }

    #[test]
    fn rejects_bad_identities() {
        assert_eq!("".parse::<Card>(), Err(CardParseError::Empty));
        assert_eq!("Ax".parse::<Card>(), Err(CardParseError::UnknownSuit('x')));
        assert_eq!(
            "1h".parse::<Card>(),
            Err(CardParseError::UnknownRank("1".to_string()))
        );
        assert_eq!(
            "h".parse::<Card>(),
            Err(CardParseError::UnknownRank(String::new()))
        );
    }

    #[test]
    fn every_identity_formats_back_to_itself() {
        for card in Card::full_deck() {
            let text = card.identity();
            assert_eq!(text.parse::<Card>(), Ok(card), "{text}");
        }
    }

    #[test]
    fn serializes_as_identity_string() {
        let card = Card::new(Rank::Ten, Suit::Clubs);
        assert_eq!(serde_json::to_string(&card).expect("json"), "\"10c\"");
        let back: Card = serde_json::from_str("\"Qs\"").expect("card");
        assert_eq!(back, Card::new(Rank::Queen, Suit::Spades));
        assert!(serde_json::from_str::<Card>("\"Zz\"").is_err());
    }
}
