//! Trade request route handlers, all requiring authentication.

pub mod create;
pub mod detail;
pub mod list;
pub mod respond;

pub use create::create_trade;
pub use detail::trade_detail;
pub use list::{received_trades, sent_trades};
pub use respond::{accept_trade, cancel_trade, decline_trade};
