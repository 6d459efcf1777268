//! Common utilities for the SecurePay connector crates

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod pii;
pub mod request;
pub mod types;
pub mod xml;

pub use errors::{CustomResult, ParsingError, ValidationError};
pub use hyperswitch_masking::{
    ExposeInterface, Mask, Maskable, PeekInterface, Secret, Strategy, StrongSecret, WithType,
};
pub use request::{Method, Request, RequestBuilder, RequestContent};
pub use types::MinorUnit;

/// Generate a random message id whose length is drawn uniformly from
/// `[max(min, 1), max]` and whose characters come from `alphabet`.
///
/// Both the length and the characters use the operating system's CSPRNG.
/// A `max` below the effective minimum yields an id of the minimum length.
pub fn generate_message_id(min: usize, max: usize, alphabet: &[char]) -> String {
    use rand::Rng;

    let min = min.max(1);
    let max = max.max(min);
    let length = rand::rngs::OsRng.gen_range(min..=max);
    nanoid::nanoid!(length, alphabet)
}

/// Message id with the SecurePay defaults: 15 to 25 lower-case hex characters
#[inline]
pub fn generate_securepay_message_id() -> String {
    generate_message_id(
        consts::MESSAGE_ID_MIN_LENGTH,
        consts::MESSAGE_ID_MAX_LENGTH,
        &consts::MESSAGE_ID_ALPHABET,
    )
}

/// Generate a UUID v4 in its hyphenated form
#[inline]
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub mod date_time {
    #[cfg(feature = "async_ext")]
    use std::time::Instant;

    use time::{
        format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime,
        PrimitiveDateTime, UtcOffset,
    };

    /// SecurePay timestamps are always written in Australian Eastern Standard Time
    const AEST_OFFSET_SECONDS: i32 = 10 * 60 * 60;

    const SECUREPAY_TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
        "[year repr:full][month padding:zero repr:numerical][day padding:zero][hour padding:zero repr:24][minute padding:zero][second padding:zero]"
    );

    /// Create a new [`PrimitiveDateTime`] with the current date and time in UTC.
    pub fn now() -> PrimitiveDateTime {
        let utc_date_time = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc_date_time.date(), utc_date_time.time())
    }

    /// Return the UNIX timestamp of the current date and time in UTC
    pub fn now_unix_timestamp() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    /// Calculate execution time for a async block in milliseconds
    #[cfg(feature = "async_ext")]
    pub async fn time_it<T, Fut: futures::Future<Output = T>, F: FnOnce() -> Fut>(
        block: F,
    ) -> (T, f64) {
        let start = Instant::now();
        let result = block().await;
        (result, start.elapsed().as_secs_f64() * 1000f64)
    }

    /// Format an instant as `YYYYMMDDHHmmss000+600`, the SecurePay message timestamp.
    pub fn format_securepay_timestamp(
        instant: OffsetDateTime,
    ) -> Result<String, time::error::Format> {
        let offset = UtcOffset::from_whole_seconds(AEST_OFFSET_SECONDS)
            .unwrap_or(UtcOffset::UTC);
        let local = instant.to_offset(offset);
        Ok(format!("{}000+600", local.format(SECUREPAY_TIMESTAMP)?))
    }

    /// The current time as a SecurePay message timestamp
    pub fn securepay_timestamp() -> Result<String, time::error::Format> {
        format_securepay_timestamp(OffsetDateTime::now_utc())
    }

}
