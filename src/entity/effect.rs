/// Short-lived entity (e.g. an exploding bomb). Once its lifetime has
/// elapsed it detonates via the combat resolver and is removed in the
/// same tick, never carried over.
#[derive(Clone, Copy, Debug)]
pub struct TemporaryEffect {
    created_ms: u64,
    lifetime_ms: u64,
}

impl TemporaryEffect {
    pub fn new(created_ms: u64, lifetime_ms: u64) -> Self {
        Self {
            created_ms,
            lifetime_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_ms) >= self.lifetime_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_at_its_lifetime() {
        let effect = TemporaryEffect::new(1000, 2100);
        assert!(!effect.is_expired(1000));
        assert!(!effect.is_expired(3099));
        assert!(effect.is_expired(3100));
        assert!(effect.is_expired(10_000));
    }
}
