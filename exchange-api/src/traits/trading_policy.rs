use crate::model::{quote::Quote, trade::TradeOrder};

pub trait TradingPolicy: Send {
    /// Called for every quote the trader receives.
    ///
    /// # Arguments
    ///
    /// * `quote` - The latest market snapshot, for any company.
    ///
    /// # Returns
    ///
    /// * `Option<TradeOrder>` - The trade to submit, or `None` to stay idle.
    fn on_quote(&mut self, quote: &Quote) -> Option<TradeOrder>;
}

impl TradingPolicy for Box<dyn TradingPolicy> {
    fn on_quote(&mut self, quote: &Quote) -> Option<TradeOrder> {
        (**self).on_quote(quote)
    }
}
