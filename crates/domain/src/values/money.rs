use serde::{Deserialize, Serialize};

use super::{ValueError, require_non_blank};

/// A non-negative monetary amount in a single currency.
///
/// The amount is held in minor units (cents), which keeps the two-decimal
/// representation exact: no operation can produce sub-cent values, so no
/// rounding step exists to get wrong. Negative amounts are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (e.g. 650 = 6.50).
    cents: u64,

    /// ISO-style currency code, e.g. "EUR".
    currency: String,
}

impl Money {
    /// Creates a new amount, rejecting a blank currency code.
    pub fn new(cents: u64, currency: impl Into<String>) -> Result<Self, ValueError> {
        let currency = currency.into();
        require_non_blank("currency", &currency)?;
        Ok(Self { cents, currency })
    }

    /// Creates a euro amount from cents.
    pub fn eur(cents: u64) -> Self {
        Self {
            cents,
            currency: "EUR".to_string(),
        }
    }

    /// Returns the amount in minor units.
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Adds another amount in the same currency.
    ///
    /// Fails if the currencies differ; amounts in different currencies have
    /// no meaningful sum.
    pub fn add(&self, other: &Money) -> Result<Money, ValueError> {
        if self.currency != other.currency {
            return Err(ValueError::CurrencyMismatch {
                currency: self.currency.clone(),
                other: other.currency.clone(),
            });
        }
        Ok(Money {
            cents: self.cents + other.cents,
            currency: self.currency.clone(),
        })
    }

    /// Scales the amount by an integer factor.
    pub fn multiply(&self, factor: u32) -> Money {
        Money {
            cents: self.cents * u64::from(factor),
            currency: self.currency.clone(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}.{:02}",
            self.currency,
            self.cents / 100,
            self.cents % 100
        )
    }
}
