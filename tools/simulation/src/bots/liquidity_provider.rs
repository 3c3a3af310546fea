//! Liquidity provider bot: two-sided quotes around mid
//!
//! Each time its countdown fires the provider quotes a bid and an ask at
//! `mid ∓ half_spread` and cancels its oldest quotes beyond the configured
//! limit. Quotes that were filled in the meantime produce cancel misses,
//! which the exchange treats as no-ops.

use matching_engine::{DecisionContext, Strategy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use types::numeric::Money;
use types::order::{CancelOrderReq, LimitOrderReq, OrderDir, OrderRequest};

use super::countdown::Countdown;
use crate::config::LiquidityProviderConfig;

pub struct LiquidityProvider {
    config: LiquidityProviderConfig,
    countdown: Countdown,
    outstanding: VecDeque<LimitOrderReq>,
    rng: ChaCha8Rng,
}

impl LiquidityProvider {
    /// Create a provider with a deterministic seed.
    pub fn new(config: LiquidityProviderConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let countdown = Countdown::from_draw(config.interarrival.sample(&mut rng));
        Self {
            config,
            countdown,
            outstanding: VecDeque::new(),
            rng,
        }
    }

    /// Bid and ask prices around `mid`; None if the bid would not be positive
    pub fn quote_prices(mid: Money, half_spread: Money) -> Option<(Money, Money)> {
        let bid = mid.checked_sub(half_spread).ok()?;
        let ask = mid.checked_add(half_spread).ok()?;
        bid.is_positive().then_some((bid, ask))
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

impl Strategy for LiquidityProvider {
    fn name(&self) -> &'static str {
        "liquidity_provider"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Vec<OrderRequest> {
        if !self.countdown.tick_and_check() {
            return Vec::new();
        }
        self.countdown = Countdown::from_draw(self.config.interarrival.sample(&mut self.rng));

        let half_spread = Money::money(self.config.half_spread_cents.sample(&mut self.rng));
        let Some((bid, ask)) = Self::quote_prices(ctx.state.mid_price, half_spread) else {
            return Vec::new();
        };

        let mut requests = Vec::new();
        for (dir, price) in [(OrderDir::Bid, bid), (OrderDir::Ask, ask)] {
            let volume = self.config.volume.sample(&mut self.rng);
            let ts = ctx.stamp();
            if let Ok(quote) = LimitOrderReq::new(volume, ctx.participant_id, price, dir, ts) {
                self.outstanding.push_back(quote);
                requests.push(quote.into());
            }
        }

        while self.outstanding.len() > self.config.max_outstanding_quotes {
            let Some(oldest) = self.outstanding.pop_front() else {
                break;
            };
            requests.push(CancelOrderReq::for_order(&oldest, ctx.stamp()).into());
        }

        requests
    }
}
