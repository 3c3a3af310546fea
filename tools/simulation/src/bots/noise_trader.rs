//! Noise trader bot: random market and limit orders
//!
//! Picks a side at random when its countdown fires. Market orders are sized
//! against the contra volume in the tick's book snapshot and fall back to a
//! passive limit order when that share rounds down to nothing. Limit orders
//! rest at or behind the best price of their own side.

use matching_engine::{BookState, DecisionContext, Strategy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use types::numeric::Money;
use types::order::{LimitOrderReq, MarketOrderReq, OrderDir, OrderRequest};

use super::countdown::Countdown;
use crate::config::NoiseTraderConfig;

pub struct NoiseTrader {
    config: NoiseTraderConfig,
    countdown: Countdown,
    rng: ChaCha8Rng,
}

impl NoiseTrader {
    /// Create a trader with a deterministic seed.
    pub fn new(config: NoiseTraderConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let countdown = Countdown::from_draw(config.interarrival.sample(&mut rng));
        Self {
            config,
            countdown,
            rng,
        }
    }

    /// Largest market order the snapshot allows on `dir`
    pub fn market_capacity(&self, state: &BookState, dir: OrderDir) -> u64 {
        state.volume(dir.contra()) / self.config.depth_share_divisor.max(1)
    }

    /// Passive price: below the best bid, or above the best ask
    pub fn passive_price(state: &BookState, dir: OrderDir, offset: Money) -> Option<Money> {
        let best = state.best_price(dir);
        let price = match dir {
            OrderDir::Bid => best.checked_sub(offset).ok()?,
            OrderDir::Ask => best.checked_add(offset).ok()?,
        };
        price.is_positive().then_some(price)
    }
}

impl Strategy for NoiseTrader {
    fn name(&self) -> &'static str {
        "noise_trader"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Vec<OrderRequest> {
        if !self.countdown.tick_and_check() {
            return Vec::new();
        }
        self.countdown = Countdown::from_draw(self.config.interarrival.sample(&mut self.rng));

        let dir = if self.rng.gen_bool(0.5) { OrderDir::Bid } else { OrderDir::Ask };
        let volume = self.config.volume.sample(&mut self.rng);

        if self.rng.gen_ratio(self.config.market_order_percent.min(100), 100) {
            let volume = volume.min(self.market_capacity(ctx.state, dir));
            if volume > 0 {
                let ts = ctx.stamp();
                if let Ok(req) = MarketOrderReq::new(volume, ctx.participant_id, dir, ts) {
                    return vec![req.into()];
                }
            }
        }

        let offset = Money::money(self.config.limit_offset_cents.sample(&mut self.rng));
        let Some(price) = Self::passive_price(ctx.state, dir, offset) else {
            return Vec::new();
        };
        let ts = ctx.stamp();
        match LimitOrderReq::new(volume, ctx.participant_id, price, dir, ts) {
            Ok(req) => vec![req.into()],
            Err(_) => Vec::new(),
        }
    }
}
