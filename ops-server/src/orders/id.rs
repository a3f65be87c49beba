//! Order id generation
//!
//! `ORD` + `yyMMddHHmmss` (UTC) + 3 random digits, e.g. `ORD250618143005042`.
//! Uniqueness is enforced by the orders primary key; callers regenerate on
//! collision up to [`ID_RETRY_LIMIT`] times.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const ORDER_ID_PREFIX: &str = "ORD";

/// Attempts before giving up with `DuplicateId`
pub const ID_RETRY_LIMIT: usize = 5;

pub fn generate_order_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(0..1000);
    format!(
        "{ORDER_ID_PREFIX}{}{suffix:03}",
        now.format("%y%m%d%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn format_matches_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 6, 18, 14, 30, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_order_id(now, &mut rng);

        assert_eq!(id.len(), 18);
        assert!(id.starts_with("ORD250618143005"));
        assert!(id[15..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn suffix_is_zero_padded() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let id = generate_order_id(now, &mut rng);
            assert_eq!(id.len(), 18, "{id}");
        }
    }
}
