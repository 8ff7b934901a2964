use crate::{Dense, Set};

/// Visited-node bookkeeping for a graph traversal.
///
/// Lets traversal code be written once and run over either a [`Set`], for
/// sparse keys such as addresses, or a [`Dense`] set, for small node indices.
pub trait Visited {
    /// Marks `key` as visited. Returns `true` only the first time.
    fn visit(&mut self, key: usize) -> bool;
    fn is_visited(&self, key: usize) -> bool;
    /// Forgets every visit, keeping allocations for the next traversal.
    fn reset(&mut self);
}

impl Visited for Set {
    fn visit(&mut self, key: usize) -> bool {
        self.add(key)
    }

    fn is_visited(&self, key: usize) -> bool {
        self.contains(key)
    }

    fn reset(&mut self) {
        Set::reset(self);
    }
}

impl Visited for Dense {
    fn visit(&mut self, key: usize) -> bool {
        if self.contains(key) {
            return false;
        }
        self.add(key);
        true
    }

    fn is_visited(&self, key: usize) -> bool {
        self.contains(key)
    }

    fn reset(&mut self) {
        Dense::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_twice<V: Visited + Default>() {
        let mut v = V::default();
        assert!(!v.is_visited(3));
        assert!(v.visit(3));
        assert!(!v.visit(3));
        assert!(v.is_visited(3));
        v.reset();
        assert!(!v.is_visited(3));
        assert!(v.visit(3));
    }

    #[test]
    fn set_visits() {
        visit_twice::<Set>();
    }

    #[test]
    fn dense_visits() {
        visit_twice::<Dense>();
    }
}
