pub mod quote_feed;
pub mod trading_policy;
