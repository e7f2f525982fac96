// Expiry evaluation - days remaining and threshold checks

use crate::monitor::types::CertificateObservation;
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days between `now` and `not_after`, rounded up.
///
/// The distance is absolute: a certificate that expired five days ago yields 5,
/// the same as one expiring in five days. Callers that need the direction use
/// [`CertificateObservation::is_expired`].
pub fn days_until_expiry(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = not_after.signed_duration_since(now).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// An observation is overdue when fewer than `threshold` days remain
pub fn is_overdue(observation: &CertificateObservation, threshold: i64) -> bool {
    observation.days_remaining < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::types::HostTarget;
    use chrono::Duration;

    fn observation(days_remaining: i64) -> CertificateObservation {
        let now = Utc::now();
        CertificateObservation {
            host: "a.example".to_string(),
            port: 443,
            valid_from: now - Duration::days(90),
            valid_to: now + Duration::days(days_remaining),
            days_remaining,
        }
    }

    #[test]
    fn test_days_rounds_up_partial_days() {
        let now = Utc::now();
        assert_eq!(days_until_expiry(now + Duration::hours(1), now), 1);
        assert_eq!(days_until_expiry(now + Duration::days(9) + Duration::hours(23), now), 10);
        assert_eq!(days_until_expiry(now + Duration::days(10), now), 10);
        assert_eq!(days_until_expiry(now, now), 0);
    }

    #[test]
    fn test_days_is_absolute_for_expired_certificates() {
        let now = Utc::now();
        assert_eq!(days_until_expiry(now - Duration::days(5), now), 5);
        assert_eq!(
            days_until_expiry(now - Duration::days(10), now),
            days_until_expiry(now + Duration::days(10), now)
        );
    }

    #[test]
    fn test_is_overdue_is_strict() {
        assert!(is_overdue(&observation(10), 30));
        assert!(is_overdue(&observation(29), 30));
        assert!(!is_overdue(&observation(30), 30));
        assert!(!is_overdue(&observation(60), 30));
    }

    #[test]
    fn test_zero_threshold_never_overdue() {
        assert!(!is_overdue(&observation(0), 0));
    }

    #[test]
    fn test_expired_certificate_is_overdue() {
        let now = Utc::now();
        let target = HostTarget::new("a.example", 443).unwrap();
        let obs = CertificateObservation::new(
            &target,
            now - Duration::days(95),
            now - Duration::days(5),
            now,
        );

        assert_eq!(obs.days_remaining, 5);
        assert!(is_overdue(&obs, 30));
    }
}
