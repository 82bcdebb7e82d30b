#![forbid(unsafe_code)]

//! Dashboard widgets: cards, drawer, and ticker.

pub mod deal_card;
pub mod ticker;
pub mod valuation_drawer;

pub use deal_card::{CARD_HEIGHT, CARD_MIN_WIDTH, DealCard};
pub use ticker::{DealTicker, TICKER_ITEMS};
pub use valuation_drawer::{DRAWER_MAX_WIDTH, ValuationDrawer};
