use std::sync::{
    atomic::{
        AtomicU64, 
        Ordering
    }, 
    Arc
};

// Identifies a handler list or a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    pub fn new(val: u64) -> Self {
        Self(val)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct KeyGenerator {
    inner: Arc<AtomicU64>
}

impl KeyGenerator {
    pub fn new(min_key_value: u64) -> Self {
        Self {
            inner: Arc::new(AtomicU64::new(min_key_value)),
        }
    }

    pub fn get(&self) -> Key {
        Key::new(self.inner.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_monotonic() {
        let keys = KeyGenerator::new(10);
        let a = keys.get();
        let b = keys.get();
        assert_eq!(a.as_u64(), 10);
        assert_eq!(b.as_u64(), 11);
        assert!(a < b);
    }

    #[test]
    fn test_cloned_generator_shares_counter() {
        let keys = KeyGenerator::new(0);
        let other = keys.clone();
        assert_eq!(keys.get(), Key::new(0));
        assert_eq!(other.get(), Key::new(1));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(format!("{}", Key::new(7)), "#7");
    }
}
