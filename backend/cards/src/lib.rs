pub mod validate;

use common_utils::{date_time, errors};
use error_stack::report;
use hyperswitch_masking::{PeekInterface, Secret, StrongSecret};
use time::{util::days_in_year_month, Date, Duration, Month, PrimitiveDateTime, Time};

pub use crate::validate::{CCValError, CardNumber, CardNumberStrategy};

/// Three or four digit card verification value. Leading zeros are significant.
pub struct CardSecurityCode(StrongSecret<String>);

impl CardSecurityCode {
    pub fn new(secret: StrongSecret<String>) -> errors::CustomResult<Self, errors::ValidationError> {
        let csc = secret.peek();

        if (3..=4).contains(&csc.len()) && csc.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card security code".to_string()
            }))
        }
    }
}

pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    pub fn new(secret: StrongSecret<u8>) -> errors::CustomResult<Self, errors::ValidationError> {
        let month = secret.peek();

        if (1..=12).contains(month) {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            }))
        }
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

pub struct CardExpirationYear(StrongSecret<u16>);

impl CardExpirationYear {
    /// Accepts a four digit year, or a two digit one taken to be in the 2000s.
    pub fn new(secret: StrongSecret<u16>) -> errors::CustomResult<Self, errors::ValidationError> {
        let year = *secret.peek();

        if year < 100 {
            Ok(Self(StrongSecret::new(2000 + year)))
        } else if (1997..=9999).contains(&year) {
            Ok(Self(secret))
        } else {
            Err(report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            }))
        }
    }

    pub fn four_digits(&self) -> String {
        self.0.peek().to_string()
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek() % 100)
    }
}

pub struct CardExpiration {
    pub month: CardExpirationMonth,
    pub year: CardExpirationYear,
}

impl CardExpiration {
    pub fn new(
        secret_month: StrongSecret<u8>,
        secret_year: StrongSecret<u16>,
    ) -> errors::CustomResult<Self, errors::ValidationError> {
        Ok(Self {
            month: CardExpirationMonth::new(secret_month)?,
            year: CardExpirationYear::new(secret_year)?,
        })
    }

    /// Parses the month and year as entered on a payment form.
    pub fn from_strs(
        month: &str,
        year: &str,
    ) -> errors::CustomResult<Self, errors::ValidationError> {
        let month = month.trim().parse::<u8>().map_err(|_| {
            report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration month".to_string()
            })
        })?;
        let year = year.trim().parse::<u16>().map_err(|_| {
            report!(errors::ValidationError::InvalidValue {
                message: "invalid card expiration year".to_string()
            })
        })?;
        Self::new(StrongSecret::new(month), StrongSecret::new(year))
    }

    /// Expiry as `MM/YY`
    pub fn to_mm_yy(&self) -> Secret<String> {
        Secret::new(format!(
            "{}/{}",
            self.month.two_digits(),
            self.year.two_digits()
        ))
    }

    pub fn is_expired(&self) -> bool {
        let current_datetime_utc = date_time::now();
        let year = i32::from(*self.year.0.peek());
        let Ok(month) = Month::try_from(*self.month.0.peek()) else {
            return true;
        };

        // card expiry day is last day of the expiration month
        let expiration_day = days_in_year_month(year, month);
        let Ok(expiration_date) = Date::from_calendar_date(year, month, expiration_day) else {
            return true;
        };

        // max diff b/w utc and other timezones is 14 hours
        let expiration_datetime_utc =
            PrimitiveDateTime::new(expiration_date, Time::MIDNIGHT).saturating_add(Duration::days(1));

        current_datetime_utc > expiration_datetime_utc
    }

    pub fn get_month(&self) -> &CardExpirationMonth {
        &self.month
    }

    pub fn get_year(&self) -> &CardExpirationYear {
        &self.year
    }
}

impl PeekInterface<StrongSecret<String>> for CardSecurityCode {
    fn peek(&self) -> &StrongSecret<String> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<String> {
        &mut self.0
    }
}

impl PeekInterface<StrongSecret<u8>> for CardExpirationMonth {
    fn peek(&self) -> &StrongSecret<u8> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<u8> {
        &mut self.0
    }
}

impl PeekInterface<StrongSecret<u16>> for CardExpirationYear {
    fn peek(&self) -> &StrongSecret<u16> {
        &self.0
    }

    fn peek_mut(&mut self) -> &mut StrongSecret<u16> {
        &mut self.0
    }
}

/// Card data captured for a single payment attempt.
///
/// Deliberately not `Clone`: a value is moved into the request builder and
/// zeroised when dropped.
pub struct CardDetails {
    pub number: CardNumber,
    pub expiry: CardExpiration,
    pub security_code: CardSecurityCode,
    pub holder_name: Option<Secret<String>>,
}

impl CardDetails {
    pub fn new(
        number: &str,
        expiry_month: &str,
        expiry_year: &str,
        security_code: &str,
        holder_name: Option<Secret<String>>,
    ) -> errors::CustomResult<Self, errors::ValidationError> {
        let number = number.parse::<CardNumber>().map_err(|_| {
            report!(errors::ValidationError::IncorrectValueProvided {
                field_name: "number"
            })
        })?;
        let expiry = CardExpiration::from_strs(expiry_month, expiry_year)?;
        let security_code = CardSecurityCode::new(StrongSecret::new(security_code.trim().to_string()))?;
        Ok(Self {
            number,
            expiry,
            security_code,
            holder_name,
        })
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &self.number)
            .field("expiry", &"**/**")
            .field("security_code", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hyperswitch_masking::ExposeInterface;

    use super::*;

    #[test]
    fn test_expiry_formats_as_mm_yy() {
        let expiry = CardExpiration::from_strs("3", "2031").unwrap();
        assert_eq!(expiry.to_mm_yy().expose(), "03/31");

        let expiry = CardExpiration::from_strs("12", "29").unwrap();
        assert_eq!(expiry.to_mm_yy().expose(), "12/29");
        assert_eq!(expiry.get_year().four_digits(), "2029");
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(CardExpiration::from_strs("13", "2030").is_err());
        assert!(CardExpiration::from_strs("0", "2030").is_err());
        assert!(CardExpiration::from_strs("ab", "2030").is_err());
    }

    #[test]
    fn test_expiry_in_the_past() {
        assert!(CardExpiration::from_strs("1", "2000").unwrap().is_expired());
        assert!(!CardExpiration::from_strs("12", "2099").unwrap().is_expired());
    }

    #[test]
    fn test_security_code_keeps_leading_zero() {
        let csc = CardSecurityCode::new(StrongSecret::new("012".to_string())).unwrap();
        assert_eq!(csc.peek().peek(), "012");
        assert!(CardSecurityCode::new(StrongSecret::new("12".to_string())).is_err());
        assert!(CardSecurityCode::new(StrongSecret::new("12a".to_string())).is_err());
    }

    #[test]
    fn test_card_details_debug_hides_everything() {
        let card = CardDetails::new("4444333322221111", "11", "2030", "123", None).unwrap();
        let debug = format!("{card:?}");
        assert!(!debug.contains("4444333322221111"));
        assert!(!debug.contains("123"));
    }

    #[test]
    fn test_card_details_rejects_bad_number() {
        let error = CardDetails::new("1234", "11", "2030", "123", None).unwrap_err();
        assert_eq!(
            *error.current_context(),
            errors::ValidationError::IncorrectValueProvided {
                field_name: "number"
            }
        );
    }
}
