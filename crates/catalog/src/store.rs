use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use factory_core::Entity;

/// Keyed record storage for catalog entities.
pub trait Repository<V: Entity>: Send + Sync {
    fn get(&self, id: V::Id) -> Option<V>;
    fn upsert(&self, value: V);
    fn remove(&self, id: V::Id) -> Option<V>;
    /// All records, oldest insertion first.
    fn list(&self) -> Vec<V>;
}

impl<V, S> Repository<V> for Arc<S>
where
    V: Entity,
    S: Repository<V> + ?Sized,
{
    fn get(&self, id: V::Id) -> Option<V> {
        (**self).get(id)
    }

    fn upsert(&self, value: V) {
        (**self).upsert(value)
    }

    fn remove(&self, id: V::Id) -> Option<V> {
        (**self).remove(id)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }
}

/// In-memory store for dev/tests. Listing follows insertion order; an
/// upsert of an existing record keeps its position.
#[derive(Debug)]
pub struct InMemoryRepository<V: Entity> {
    inner: RwLock<Rows<V>>,
}

#[derive(Debug)]
struct Rows<V: Entity> {
    next_seq: u64,
    index: HashMap<V::Id, u64>,
    rows: BTreeMap<u64, V>,
}

impl<V: Entity> InMemoryRepository<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                next_seq: 0,
                index: HashMap::new(),
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<V: Entity> Default for InMemoryRepository<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Repository<V> for InMemoryRepository<V>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync,
{
    fn get(&self, id: V::Id) -> Option<V> {
        let rows = self.inner.read().ok()?;
        let seq = rows.index.get(&id)?;
        rows.rows.get(seq).cloned()
    }

    fn upsert(&self, value: V) {
        if let Ok(mut rows) = self.inner.write() {
            let existing = rows.index.get(&value.id()).copied();
            let seq = match existing {
                Some(seq) => seq,
                None => {
                    let seq = rows.next_seq;
                    rows.next_seq += 1;
                    rows.index.insert(value.id(), seq);
                    seq
                }
            };
            rows.rows.insert(seq, value);
        }
    }

    fn remove(&self, id: V::Id) -> Option<V> {
        let mut rows = self.inner.write().ok()?;
        let seq = rows.index.remove(&id)?;
        rows.rows.remove(&seq)
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(rows) => rows.rows.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
