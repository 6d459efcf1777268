//! Types that can be used in other crates

use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use common_enums::enums;
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};

use crate::errors::ParsingError;

/// This Unit struct represents MinorUnit in which core amount works
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// checks if the amount is greater than the given value
    pub fn is_greater_than(&self, value: i64) -> bool {
        self.get_amount_as_i64() > value
    }

    /// Parses a decimal major-unit amount such as `"19.99"` into minor units (`1999`).
    ///
    /// Amounts with more fractional digits than the currency carries are rounded
    /// half away from zero.
    pub fn from_major_str(
        amount: &str,
        currency: enums::Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let amount_decimal = Decimal::from_str(amount.trim()).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;
        Self::from_major_decimal(amount_decimal, currency)
    }

    fn from_major_decimal(
        amount: Decimal,
        currency: enums::Currency,
    ) -> Result<Self, error_stack::Report<ParsingError>> {
        let scale = Decimal::from_i64(10_i64.pow(currency.number_of_digits_after_decimal_point()))
            .ok_or(ParsingError::I64ToDecimalConversionFailure)?;
        let minor = amount
            .checked_mul(scale)
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        let amount_i64 = minor
            .to_i64()
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?;
        Ok(Self(amount_i64))
    }

    /// Convert the amount to its major denomination based on Currency and return String
    pub fn to_major_unit_as_string(
        self,
        currency: enums::Currency,
    ) -> Result<String, error_stack::Report<ParsingError>> {
        let amount_decimal =
            Decimal::from_i64(self.0).ok_or(ParsingError::I64ToDecimalConversionFailure)?;
        let digits = currency.number_of_digits_after_decimal_point();
        let major = amount_decimal / Decimal::from(10_i64.pow(digits));
        Ok(format!("{major:.prec$}", prec = digits as usize))
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

#[cfg(test)]
mod amount_conversion_tests {
    use super::*;

    #[test]
    fn major_string_to_minor_unit() {
        let amount = MinorUnit::from_major_str("19.99", enums::Currency::AUD).unwrap();
        assert_eq!(amount.get_amount_as_i64(), 1999);

        let amount = MinorUnit::from_major_str("10", enums::Currency::AUD).unwrap();
        assert_eq!(amount.get_amount_as_i64(), 1000);

        let amount = MinorUnit::from_major_str("500", enums::Currency::JPY).unwrap();
        assert_eq!(amount.get_amount_as_i64(), 500);

        let amount = MinorUnit::from_major_str("1.234", enums::Currency::KWD).unwrap();
        assert_eq!(amount.get_amount_as_i64(), 1234);
    }

    #[test]
    fn excess_precision_is_rounded() {
        let amount = MinorUnit::from_major_str("0.125", enums::Currency::AUD).unwrap();
        assert_eq!(amount.get_amount_as_i64(), 13);
    }

    #[test]
    fn garbage_amount_is_rejected() {
        assert!(MinorUnit::from_major_str("ten dollars", enums::Currency::AUD).is_err());
    }

    #[test]
    fn oversized_amount_is_an_error() {
        let error =
            MinorUnit::from_major_str("79228162514264337593543950335", enums::Currency::AUD)
                .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ParsingError::DecimalToI64ConversionFailure
        );
        // Fits a Decimal but not an i64 once scaled.
        assert!(MinorUnit::from_major_str("100000000000000000", enums::Currency::AUD).is_err());
    }

    #[test]
    fn minor_unit_to_major_string() {
        let amount = MinorUnit::new(1999);
        assert_eq!(
            amount.to_major_unit_as_string(enums::Currency::AUD).unwrap(),
            "19.99"
        );
        assert_eq!(
            MinorUnit::new(500)
                .to_major_unit_as_string(enums::Currency::JPY)
                .unwrap(),
            "500"
        );
    }

    #[test]
    fn minor_unit_serializes_as_integer() {
        let value = serde_json::to_value(MinorUnit::new(1999)).unwrap();
        assert_eq!(value, serde_json::json!(1999));
    }
}
