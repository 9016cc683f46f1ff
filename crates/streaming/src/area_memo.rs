use std::collections::BTreeSet;

use foundation::AreaKey;

/// Area cells that already had an import attempted this session.
///
/// Append-only: no eviction and no persistence. Only imports are memoized;
/// POI reads always go to the source.
#[derive(Debug, Default, Clone)]
pub struct AreaMemo {
    attempted: BTreeSet<AreaKey>,
}

impl AreaMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_attempted(&self, key: &AreaKey) -> bool {
        self.attempted.contains(key)
    }

    /// Records an attempt. Returns `true` if the key was not recorded before.
    pub fn mark_attempted(&mut self, key: AreaKey) -> bool {
        self.attempted.insert(key)
    }

    pub fn len(&self) -> usize {
        self.attempted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaKey> + '_ {
        self.attempted.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::AreaMemo;
    use foundation::{AreaKey, Coordinates};

    #[test]
    fn marking_is_idempotent() {
        let mut memo = AreaMemo::new();
        let key = AreaKey::of(Coordinates::new(52.52, 13.405).unwrap());
        assert!(!memo.has_attempted(&key));
        assert!(memo.mark_attempted(key));
        assert!(!memo.mark_attempted(key));
        assert!(memo.has_attempted(&key));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn neighbouring_cells_are_independent() {
        let mut memo = AreaMemo::new();
        let a = AreaKey::of(Coordinates::new(52.52, 13.405).unwrap());
        let b = AreaKey::of(Coordinates::new(52.56, 13.405).unwrap());
        memo.mark_attempted(a);
        assert!(!memo.has_attempted(&b));
        let keys: Vec<String> = memo.iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["52.50_13.40".to_string()]);
    }
}
