use std::{fmt, ops::Deref, str::FromStr};

use hyperswitch_masking::{PeekInterface, Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("not a valid credit card number")]
pub struct CCValError;

impl From<core::convert::Infallible> for CCValError {
    fn from(_: core::convert::Infallible) -> Self {
        Self
    }
}

/// A Luhn-valid primary account number with whitespace removed
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect::<String>()
    }

    pub fn get_last4(&self) -> String {
        let number = self.0.peek();
        number
            .get(number.len().saturating_sub(4)..)
            .unwrap_or_default()
            .to_string()
    }
}

impl FromStr for CardNumber {
    type Err = CCValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cc_no_whitespace: String = s.split_whitespace().collect();
        if cc_no_whitespace.len() < 12 || cc_no_whitespace.len() > 19 {
            return Err(CCValError);
        }
        match luhn::valid(&cc_no_whitespace) {
            true => Ok(Self(StrongSecret::from_str(&cc_no_whitespace)?)),
            false => Err(CCValError),
        }
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CCValError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        match val_str.get(..6) {
            Some(value) => write!(f, "{}{}", value, "*".repeat(val_str.len() - 6)),
            None => WithType::fmt(val, f),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hyperswitch_masking::Secret;

    use super::*;

    #[test]
    fn valid_card_number() {
        let s = "4444333322221111";
        assert_eq!(CardNumber::from_str(s).unwrap().peek(), s);
    }

    #[test]
    fn invalid_card_number() {
        let s = "4444333322221112";
        assert_eq!(
            CardNumber::from_str(s).unwrap_err().to_string(),
            "not a valid credit card number".to_string()
        );
        assert!(CardNumber::from_str("0").is_err());
    }

    #[test]
    fn card_number_no_whitespace() {
        let s = "4444 3333   2222 1111";
        assert_eq!(CardNumber::from_str(s).unwrap().peek(), "4444333322221111");
    }

    #[test]
    fn test_valid_card_number_masking() {
        let secret: Secret<String, CardNumberStrategy> =
            Secret::new("4444333322221111".to_string());
        assert_eq!("444433**********", format!("{secret:?}"));
    }

    #[test]
    fn test_card_number_debug_is_masked() {
        let card_number = CardNumber::from_str("4444 3333 2222 1111").unwrap();
        assert_eq!(
            "CardNumber(444433**********)",
            format!("{card_number:?}")
        );
    }

    #[test]
    fn test_last4() {
        let card_number = CardNumber::from_str("4444333322221111").unwrap();
        assert_eq!(card_number.get_last4(), "1111");
        assert_eq!(card_number.get_card_isin(), "444433");
    }

    #[test]
    fn test_invalid_card_number_deserialization() {
        let card_number = serde_json::from_str::<CardNumber>(r#""1234 5678""#);
        let error_msg = card_number.unwrap_err().to_string();
        assert_eq!(error_msg, "not a valid credit card number".to_string());
    }
}
