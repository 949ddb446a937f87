//! Compulsive traders: one company, one share count, a trade on every tick.

pub mod agent;
pub mod policy;

pub use agent::{RunningTrader, TraderAgent};
pub use policy::CompulsivePolicy;
