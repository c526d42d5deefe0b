//! Currency cross-rates and rounding conventions.
//!
//! INR is quoted per whole rupee, BHD to the fils (3 dp), USD to the cent.
//! Midpoints round away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::entities::sea_orm_active_enums::Market;
use crate::error::PricingError;

/// Rupees per US dollar
pub const INR_PER_USD: Decimal = dec!(83.5);

/// Dinars per US dollar
pub const BHD_PER_USD: Decimal = dec!(0.376);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Inr,
    Bhd,
    Usd,
}

impl Currency {
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::Inr => 0,
            Currency::Bhd => 3,
            Currency::Usd => 2,
        }
    }

    /// Currency a market quotes its local rate in
    pub fn native_to(market: Market) -> Self {
        match market {
            Market::India => Currency::Inr,
            Market::Bahrain => Currency::Bhd,
        }
    }
}

pub fn round_currency(value: Decimal, currency: Currency) -> Decimal {
    value.round_dp_with_strategy(currency.decimal_places(), RoundingStrategy::MidpointAwayFromZero)
}

/// Rounded and padded to the currency's minor unit ("6563", "29.550", "78.60")
pub fn format_amount(value: Decimal, currency: Currency) -> String {
    let mut rounded = round_currency(value, currency);
    rounded.rescale(currency.decimal_places());
    rounded.to_string()
}

pub fn parse_amount(raw: &str) -> Result<Decimal, PricingError> {
    Decimal::from_str(raw.trim()).map_err(|_| PricingError::CorruptRate(raw.to_string()))
}

/// 83.5 / 0.376 rupees per dinar
pub fn inr_per_bhd() -> Decimal {
    INR_PER_USD / BHD_PER_USD
}

/// A per-gram price expressed in all three stored currencies, already rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerGramPrices {
    pub inr: Decimal,
    pub bhd: Decimal,
    pub usd: Decimal,
}

impl PerGramPrices {
    pub fn from_inr(inr: Decimal) -> Self {
        Self::rounded(inr, inr / inr_per_bhd(), inr / INR_PER_USD)
    }

    pub fn from_bhd(bhd: Decimal) -> Self {
        Self::rounded(bhd * inr_per_bhd(), bhd, bhd / BHD_PER_USD)
    }

    pub fn from_usd(usd: Decimal) -> Self {
        Self::rounded(usd * INR_PER_USD, usd * BHD_PER_USD, usd)
    }

    /// Interpret `value` in the market's own currency
    pub fn from_native(market: Market, value: Decimal) -> Self {
        match Currency::native_to(market) {
            Currency::Inr => Self::from_inr(value),
            Currency::Bhd => Self::from_bhd(value),
            Currency::Usd => Self::from_usd(value),
        }
    }

    fn rounded(inr: Decimal, bhd: Decimal, usd: Decimal) -> Self {
        Self {
            inr: round_currency(inr, Currency::Inr),
            bhd: round_currency(bhd, Currency::Bhd),
            usd: round_currency(usd, Currency::Usd),
        }
    }

    pub fn inr_string(&self) -> String {
        format_amount(self.inr, Currency::Inr)
    }

    pub fn bhd_string(&self) -> String {
        format_amount(self.bhd, Currency::Bhd)
    }

    pub fn usd_string(&self) -> String {
        format_amount(self.usd, Currency::Usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_currency(dec!(75474.5), Currency::Inr), dec!(75475));
        assert_eq!(round_currency(dec!(1.0005), Currency::Bhd), dec!(1.001));
        assert_eq!(round_currency(dec!(2.345), Currency::Usd), dec!(2.35));
    }

    #[test]
    fn test_format_pads_minor_units() {
        assert_eq!(format_amount(dec!(29.5), Currency::Bhd), "29.500");
        assert_eq!(format_amount(dec!(6563.4), Currency::Inr), "6563");
        assert_eq!(format_amount(dec!(78.6), Currency::Usd), "78.60");
    }

    #[test]
    fn test_from_inr_derives_other_currencies() {
        let prices = PerGramPrices::from_inr(dec!(6563));
        assert_eq!(prices.inr, dec!(6563));
        // 6563 / 83.5 = 78.5988...
        assert_eq!(prices.usd, dec!(78.60));
        // 6563 / 222.0744... = 29.5531...
        assert_eq!(prices.bhd, dec!(29.553));
    }

    #[test]
    fn test_from_bhd_derives_other_currencies() {
        let prices = PerGramPrices::from_bhd(dec!(29.5));
        assert_eq!(prices.bhd, dec!(29.500));
        // 29.5 / 0.376 = 78.4574...
        assert_eq!(prices.usd, dec!(78.46));
        // 29.5 * 222.0744... = 6551.196...
        assert_eq!(prices.inr, dec!(6551));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(" 7000 ").unwrap(), dec!(7000));
        assert!(matches!(parse_amount("n/a"), Err(PricingError::CorruptRate(_))));
    }
}
