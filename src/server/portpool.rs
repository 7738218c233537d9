//! Allocates passive-mode listening ports from a configured range with O(1) choose/release.
//!
//! The pool keeps a shuffleable array of the whole range plus a parallel inverted index. Picking
//! a port swaps the chosen slot with the last usable slot and shrinks the usable count by one;
//! releasing a port reverses exactly that swap. No port is ever handed out twice concurrently,
//! and the whole structure lives behind one mutex since passive-mode churn is not hot enough to
//! need anything fancier.

use derive_more::Display;
use std::collections::HashMap;
use std::sync::Mutex;

/// Reasons [`PortPool::choose`] can fail.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PortPoolError {
    /// Passive mode is disabled (`min > max` at construction).
    #[display("passive mode disabled")]
    Disabled,
    /// Every port in the configured range is currently leased out.
    #[display("empty port not found")]
    Empty,
}

struct Inner {
    ports: Vec<u16>,
    index_of: HashMap<u16, usize>,
    usable: usize,
}

/// See module docs.
pub struct PortPool {
    inner: Option<Mutex<Inner>>,
    // `Some(0)` range (max == 0) means "let the OS choose"; represented by `inner == None` and
    // this flag set.
    os_chooses: bool,
}

impl PortPool {
    /// Builds a pool over `min..=max`. `min > max` disables passive mode; `max == 0` means "let
    /// the OS choose a port", in which case [`PortPool::choose`] always returns `0`.
    pub fn new(min: u16, max: u16) -> Self {
        if min > max {
            return PortPool { inner: None, os_chooses: false };
        }
        if max == 0 {
            return PortPool { inner: None, os_chooses: true };
        }
        let ports: Vec<u16> = (min..=max).collect();
        let index_of = ports.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let usable = ports.len();
        PortPool {
            inner: Some(Mutex::new(Inner { ports, index_of, usable })),
            os_chooses: false,
        }
    }

    /// Returns whether the configured range disabled passive mode entirely.
    pub fn is_disabled(&self) -> bool {
        self.inner.is_none() && !self.os_chooses
    }

    /// Picks a port from the pool, or `0` if the pool was configured to defer to the OS.
    pub fn choose(&self) -> Result<u16, PortPoolError> {
        if self.os_chooses {
            return Ok(0);
        }
        let mut guard = match &self.inner {
            Some(m) => m.lock().unwrap(),
            None => return Err(PortPoolError::Disabled),
        };
        if guard.usable == 0 {
            return Err(PortPoolError::Empty);
        }
        let pick = random_index(guard.usable);
        let last = guard.usable - 1;
        guard.ports.swap(pick, last);
        let a = guard.ports[pick];
        let b = guard.ports[last];
        guard.index_of.insert(a, pick);
        guard.index_of.insert(b, last);
        guard.usable -= 1;
        Ok(b)
    }

    /// Returns `port` to the pool. A no-op if the pool defers to the OS or `port` is unknown.
    pub fn release(&self, port: u16) {
        if self.os_chooses || port == 0 {
            return;
        }
        let Some(m) = &self.inner else { return };
        let mut guard = m.lock().unwrap();
        let Some(&idx) = guard.index_of.get(&port) else { return };
        if idx < guard.usable {
            // Already released, or never leased from this generation.
            return;
        }
        let first_unusable = guard.usable;
        guard.ports.swap(idx, first_unusable);
        let a = guard.ports[idx];
        let b = guard.ports[first_unusable];
        guard.index_of.insert(a, idx);
        guard.index_of.insert(b, first_unusable);
        guard.usable += 1;
    }
}

fn random_index(bound: usize) -> usize {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).expect("system RNG must be available");
    (u64::from_le_bytes(buf) % bound as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn min_greater_than_max_disables_pool() {
        let pool = PortPool::new(100, 50);
        assert!(pool.is_disabled());
        assert_eq!(pool.choose(), Err(PortPoolError::Disabled));
    }

    #[test]
    fn max_zero_defers_to_os() {
        let pool = PortPool::new(0, 0);
        assert_eq!(pool.choose(), Ok(0));
        assert_eq!(pool.choose(), Ok(0));
    }

    #[test]
    fn choose_returns_distinct_ports_until_exhausted() {
        let pool = PortPool::new(40000, 40002);
        let mut seen = HashSet::new();
        for _ in 0..3 {
            let p = pool.choose().unwrap();
            assert!(seen.insert(p), "port {p} handed out twice");
        }
        assert_eq!(pool.choose(), Err(PortPoolError::Empty));
    }

    #[test]
    fn release_makes_port_choosable_again() {
        let pool = PortPool::new(40000, 40000);
        let p = pool.choose().unwrap();
        assert_eq!(pool.choose(), Err(PortPoolError::Empty));
        pool.release(p);
        assert_eq!(pool.choose(), Ok(p));
    }
}
