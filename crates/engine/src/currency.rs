use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO currency code attached to expenses and to a settlement run.
///
/// The engine never converts between currencies: every amount in a run is
/// expected to be in the same currency, and the currency only drives
/// formatting and the mismatch check of the input audit.
///
/// ## Minor units
///
/// Amounts are stored as an `i64` number of **minor units** (see [`Money`]).
/// `minor_units()` returns how many decimal digits separate major from minor
/// units.
///
/// Example: EUR has 2 minor units, so `10.50 EUR` ⇄ `1050`; KRW has none, so
/// `15000 KRW` ⇄ `15000`.
///
/// [`Money`]: crate::Money
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Krw,
    Jpy,
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Krw => "KRW",
            Currency::Jpy => "JPY",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Krw | Currency::Jpy => 0,
            Currency::Eur | Currency::Usd => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KRW" => Ok(Currency::Krw),
            "JPY" => Ok(Currency::Jpy),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
