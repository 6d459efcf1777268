pub mod securepay;
pub use self::securepay::SecurePay;

pub mod securepaypaypal;
pub use self::securepaypaypal::SecurePayPaypal;
