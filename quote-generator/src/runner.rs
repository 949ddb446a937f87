use exchange::{Quote, QuoteFeed};
use exchange_core::bus::MessageSender;
use log::{error, info};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Drives a feed on its own period and publishes every quote.
///
/// The first quote is emitted one period after the start. Publication is
/// fire and forget: a tick nobody listens to is simply lost.
pub fn spawn_feed<F>(mut feed: F, sender: MessageSender<Quote>) -> JoinHandle<()>
where
    F: QuoteFeed + 'static,
{
    tokio::spawn(async move {
        let period = feed.period();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "Feed for {} started, publishing on '{}' every {:?}",
            feed.company_name(),
            sender.topic(),
            period
        );

        loop {
            ticker.tick().await;
            let quote = feed.next_quote();
            if let Err(e) = sender.send(&quote) {
                error!("Feed for {} failed to publish: {}", feed.company_name(), e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::Bus;
    use std::time::Duration;

    struct Counter(u64);

    impl QuoteFeed for Counter {
        fn company_name(&self) -> &str {
            "Counter"
        }

        fn period(&self) -> Duration {
            Duration::from_millis(5)
        }

        fn next_quote(&mut self) -> Quote {
            self.0 += 1;
            Quote::new("Counter", "CNT").with_shares(self.0, 100)
        }
    }

    #[tokio::test]
    async fn test_feed_publishes_in_order() {
        let bus = Bus::new();
        let mut receiver = bus.receiver::<Quote>("market");
        let task = spawn_feed(Counter(0), bus.sender("market"));

        for expected in 1..=3 {
            let quote = receiver.recv().await.unwrap();
            assert_eq!(quote.shares_available, expected);
        }
        task.abort();
    }
}
