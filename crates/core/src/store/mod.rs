use core::borrow::Borrow;
use core::fmt::Display;
use core::hash::Hash;

use hashbrown::HashMap;

pub mod book;
pub mod user;

pub use book::BookStore;
pub use user::UserStore;

/// Read-only lookup of records by key.
///
/// This is everything the assignment tracker needs from the book and user
/// stores to validate a checkout.
pub trait Registry {
    type Record;

    fn get(&self, key: &str) -> Option<&Self::Record>;

    fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V> Registry for HashMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
{
    type Record = V;

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }
}

/// Files each record of a persisted table under its own id.
///
/// When several entries carry the same id, the one already filed under that
/// id wins, otherwise the one with the smallest table key. The losers are
/// returned in table-key order.
fn rekey<K, V>(table: HashMap<K, V>, id: impl Fn(&V) -> &K) -> (HashMap<K, V>, Vec<V>)
where
    K: Clone + Display + Eq + Hash + Ord,
{
    let mut entries: Vec<(K, V)> = table.into_iter().collect();
    entries.sort_by(|(a, va), (b, vb)| (a != id(va), a).cmp(&(b != id(vb), b)));

    let mut records = HashMap::with_capacity(entries.len());
    let mut dropped = Vec::new();
    for (key, record) in entries {
        let own = id(&record).clone();
        if records.contains_key(&own) {
            tracing::warn!(%key, id = %own, "duplicate record for one id, keeping the first");
            dropped.push(record);
            continue;
        }
        if key != own {
            tracing::warn!(%key, id = %own, "record filed under a foreign key, re-keying");
        }
        records.insert(own, record);
    }
    (records, dropped)
}
