/// Single-slot cache keyed on the last query.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: Clone + PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&mut self, key: &K, compute: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        let stale = !matches!(&self.slot, Some((cached, _)) if cached == key);
        if stale {
            self.slot = None;
        }
        let (_, value) = self
            .slot
            .get_or_insert_with(|| (key.clone(), compute(key)));
        value
    }
}
