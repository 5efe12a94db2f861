use std::time::{Duration, Instant};

/// A stored value together with its absolute expiration deadline.
///
/// Entries are never mutated after construction; overwriting a key swaps in
/// a fresh `Entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    /// Creates an entry that never expires
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// Creates an entry that expires at the given instant
    pub fn with_deadline(value: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Creates an entry that expires `ttl` after `now`.
    ///
    /// A zero or absent TTL yields an entry that never expires, as does a TTL
    /// too large to be added to `now`.
    pub fn with_ttl(value: impl Into<String>, ttl: Option<Duration>, now: Instant) -> Self {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .and_then(|ttl| now.checked_add(ttl));

        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Returns the stored value as a string slice
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expiration deadline, if any
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Checks whether this entry has expired as of `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }

    /// Checks whether this entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_deadline_never_expires() {
        let entry = Entry::new("test_value");

        assert_eq!(entry.value(), "test_value");
        assert_eq!(entry.expires_at(), None);
        assert!(!entry.is_expired());
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn test_entry_not_expired() {
        let entry = Entry::with_deadline("test_value", Instant::now() + Duration::from_secs(60));

        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expired() {
        let entry = Entry::with_deadline("test_value", Instant::now() - Duration::from_secs(1));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let now = Instant::now();
        let entry = Entry::with_deadline("v", now);

        assert!(entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now - Duration::from_millis(1)));
    }

    #[test]
    fn test_with_ttl_zero_means_never_expire() {
        let now = Instant::now();

        assert_eq!(Entry::with_ttl("v", Some(Duration::ZERO), now).expires_at(), None);
        assert_eq!(Entry::with_ttl("v", None, now).expires_at(), None);
    }

    #[test]
    fn test_with_ttl_sets_absolute_deadline() {
        let now = Instant::now();
        let entry = Entry::with_ttl("v", Some(Duration::from_secs(5)), now);

        assert_eq!(entry.expires_at(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_extreme_ttl_does_not_panic() {
        let entry = Entry::with_ttl("v", Some(Duration::MAX), Instant::now());

        assert_eq!(entry.expires_at(), None);
        assert!(!entry.is_expired());
    }
}
