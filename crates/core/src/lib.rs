//! Card selection state for the odds board. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod probability;
pub mod request;
pub mod selection;
pub mod slots;
pub mod view;

pub use cards::*;
pub use probability::*;
pub use request::*;
pub use selection::*;
pub use slots::*;
pub use view::*;
