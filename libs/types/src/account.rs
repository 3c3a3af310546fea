//! Participant balances
//!
//! An [`Account`] holds a participant's capital and share position. The two
//! mutators are the whole settlement boundary. Neither checks that capital
//! or shares stay non-negative; only overflow is rejected.

use crate::errors::NumericError;
use crate::ids::ParticipantId;
use crate::numeric::Money;
use serde::{Deserialize, Serialize};

/// Capital and share position of one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: ParticipantId,
    pub capital: Money,
    pub shares: i64,
}

impl Account {
    pub fn new(id: ParticipantId, capital: Money, shares: i64) -> Self {
        Self { id, capital, shares }
    }

    /// Receive `volume` shares, pay `total_price`
    pub fn buy(&mut self, volume: u64, total_price: Money) -> Result<(), NumericError> {
        let volume = i64::try_from(volume).map_err(|_| NumericError::Overflow)?;
        let shares = self.shares.checked_add(volume).ok_or(NumericError::Overflow)?;
        let capital = self.capital.checked_sub(total_price)?;
        self.shares = shares;
        self.capital = capital;
        Ok(())
    }

    /// Deliver `volume` shares, receive `total_price`
    pub fn sell(&mut self, volume: u64, total_price: Money) -> Result<(), NumericError> {
        let volume = i64::try_from(volume).map_err(|_| NumericError::Overflow)?;
        let shares = self.shares.checked_sub(volume).ok_or(NumericError::Overflow)?;
        let capital = self.capital.checked_add(total_price)?;
        self.shares = shares;
        self.capital = capital;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(ParticipantId::new(1), Money::money(10_000), 10)
    }

    #[test]
    fn test_buy() {
        let mut acc = account();
        acc.buy(5, Money::money(2_500)).unwrap();
        assert_eq!(acc.shares, 15);
        assert_eq!(acc.capital, Money::money(7_500));
    }

    #[test]
    fn test_sell() {
        let mut acc = account();
        acc.sell(5, Money::money(2_500)).unwrap();
        assert_eq!(acc.shares, 5);
        assert_eq!(acc.capital, Money::money(12_500));
    }

    #[test]
    fn test_sign_is_unchecked() {
        let mut acc = account();
        acc.sell(25, Money::money(1)).unwrap();
        assert_eq!(acc.shares, -15);

        acc.buy(1, Money::money(50_000)).unwrap();
        assert!(acc.capital < Money::money(0));
    }

    #[test]
    fn test_overflow_leaves_account_untouched() {
        let mut acc = Account::new(ParticipantId::new(1), Money::money(0), i64::MAX);
        assert_eq!(acc.buy(1, Money::money(1)), Err(NumericError::Overflow));
        assert_eq!(acc.shares, i64::MAX);
        assert_eq!(acc.capital, Money::money(0));
    }
}
