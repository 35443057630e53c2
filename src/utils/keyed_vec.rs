use crate::{Error, Result};

/// Insertion-ordered map with few entries, looked up by key
#[derive(Debug)]
pub struct KeyedVec<K, V>
where
    K: PartialEq,
{
    keys: Vec<K>,
    values: Vec<V>,
}
impl<K, V> KeyedVec<K, V>
where
    K: PartialEq + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.keys.contains(&key) {
            return Err(Error::SimulationError(format!(
                "key {:?} is already registered",
                key
            )));
        }
        self.keys.push(key);
        self.values.push(value);
        Ok(())
    }
    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.keys.iter().position(|k| k == key)?;
        Some(&self.values[idx])
    }
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.keys.iter().position(|k| k == key)?;
        self.keys.remove(idx);
        Some(self.values.remove(idx))
    }
    pub fn len(&self) -> usize {
        self.keys.len()
    }
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
    pub fn keys(&self) -> &[K] {
        &self.keys
    }
    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.values.iter_mut()
    }
}

impl<K, V> Default for KeyedVec<K, V>
where
    K: PartialEq + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
