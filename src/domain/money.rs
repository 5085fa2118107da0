//! Currency precision and rounding for every amount the order pipeline produces.

use bigdecimal::{BigDecimal, RoundingMode};

labelled_enum! {
    /// Settlement currency of an order.
    pub enum Currency {
        Ron => "RON",
        Eur => "EUR",
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Ron
    }
}

impl Currency {
    /// Fractional digits amounts in this currency are kept at.
    pub fn precision(&self) -> i64 {
        match self {
            Currency::Ron | Currency::Eur => 2,
        }
    }

    /// Rounds half-up to the currency precision.
    pub fn round(&self, amount: &BigDecimal) -> BigDecimal {
        amount.with_scale_round(self.precision(), RoundingMode::HalfUp)
    }

    pub fn zero(&self) -> BigDecimal {
        BigDecimal::from(0).with_scale(self.precision())
    }
}

pub fn is_negative(amount: &BigDecimal) -> bool {
    *amount < BigDecimal::from(0)
}

/// Largest amount a stored line or order total can hold (`NUMERIC(14,2)`).
pub fn max_amount() -> BigDecimal {
    BigDecimal::new(99_999_999_999_999i64.into(), 2)
}

pub fn exceeds_max_amount(amount: &BigDecimal) -> bool {
    *amount > max_amount()
}
