pub mod chat;
pub mod orderbook;
pub mod price;
pub mod snapshot;
pub mod wager;

pub use chat::*;
pub use orderbook::*;
pub use price::*;
pub use snapshot::*;
pub use wager::*;
