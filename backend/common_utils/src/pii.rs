//! Personal Identifiable Information protection.

use std::fmt;

use hyperswitch_masking::{Secret, Strategy, WithType};

/// A string constant representing a redacted or masked value.
pub const REDACTED: &str = "Redacted";

/// Strategy for masking IP addresses, keeping only the first segment
#[derive(Debug, Copy, Clone)]
pub enum IpAddressStrategy {}

impl<T> Strategy<T> for IpAddressStrategy
where
    T: AsRef<str> + fmt::Debug,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();
        let separator = if val_str.contains(':') { ':' } else { '.' };
        match val_str.split_once(separator) {
            Some((first, _)) => write!(f, "{first}{separator}**{separator}**{separator}**"),
            None => WithType::fmt(val, f),
        }
    }
}

/// Client IP address forwarded to the wallet API
pub type IpAddress = Secret<String, IpAddressStrategy>;

#[cfg(test)]
mod pii_masking_strategy_tests {
    use super::*;

    #[test]
    fn test_valid_ipv4_masking() {
        let secret: IpAddress = Secret::new("203.0.113.7".to_string());
        assert_eq!("203.**.**.**", format!("{secret:?}"));
    }

    #[test]
    fn test_invalid_ip_masking() {
        let secret: IpAddress = Secret::new("localhost".to_string());
        assert_eq!("*** alloc::string::String ***", format!("{secret:?}"));
    }
}
