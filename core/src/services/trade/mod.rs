//! Trade request service module

mod service;

pub use service::{NewTradeRequest, TradeDecision, TradeService};
