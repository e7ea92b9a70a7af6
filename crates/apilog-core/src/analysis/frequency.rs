use super::Analyzer;
use super::ranking::top_n;
use crate::log::LogEntry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counts that remember the order keys were first seen in
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, count: usize) {
        match self.index.get(&key) {
            Some(&slot) => self.counts[slot].1 += count,
            None => {
                self.index.insert(key.clone(), self.counts.len());
                self.counts.push((key, count));
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Keys with their counts, in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Fold another table into this one
    ///
    /// Keys new to `self` are appended in the order `other` saw them, so
    /// merging shards in input order reproduces the unsharded table.
    pub fn merge(&mut self, other: &FrequencyTable<K>) {
        for (key, count) in other.iter() {
            self.add(key.clone(), count);
        }
    }

    /// The `n` most frequent keys, ties broken by first occurrence
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        top_n(self.counts.iter().cloned(), n)
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.increment(key);
        }
        table
    }
}

impl<K: PartialEq> PartialEq for FrequencyTable<K> {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl<K: Serialize> Serialize for FrequencyTable<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered_map::serialize(&self.counts, serializer)
    }
}

impl<'de, K> Deserialize<'de> for FrequencyTable<K>
where
    K: DeserializeOwned + Hash + Eq + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs: Vec<(K, usize)> = ordered_map::deserialize(deserializer)?;
        let mut table = Self::new();
        for (key, count) in pairs {
            table.add(key, count);
        }
        Ok(table)
    }
}

/// Serde adapter writing `(key, value)` pairs as a map in their stored order
pub(crate) mod ordered_map {
    use serde::de::{DeserializeOwned, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<K, V, S>(pairs: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        D: Deserializer<'de>,
    {
        struct PairsVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K: DeserializeOwned, V: DeserializeOwned> Visitor<'de> for PairsVisitor<K, V> {
            type Value = Vec<(K, V)>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry()? {
                    pairs.push(pair);
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}

/// Per-dimension counts for one batch of entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frequencies {
    pub ips: FrequencyTable<String>,
    pub endpoints: FrequencyTable<String>,
    pub statuses: FrequencyTable<i64>,
}

impl Frequencies {
    pub fn merge(&mut self, other: &Frequencies) {
        self.ips.merge(&other.ips);
        self.endpoints.merge(&other.endpoints);
        self.statuses.merge(&other.statuses);
    }
}

/// Counts entries by client address, endpoint and status code
pub struct FrequencyAggregator;

impl Analyzer for FrequencyAggregator {
    type Output = Frequencies;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output {
        tracing::debug!("Aggregating frequencies over {} entries", entries.len());

        let mut frequencies = Frequencies::default();
        for entry in entries {
            frequencies.ips.increment(entry.ip.clone());
            frequencies.endpoints.increment(entry.endpoint.clone());
            if let Some(status) = entry.status {
                frequencies.statuses.increment(status);
            }
        }

        tracing::debug!(
            "Found {} distinct ips, {} endpoints, {} status codes",
            frequencies.ips.len(),
            frequencies.endpoints.len(),
            frequencies.statuses.len()
        );

        frequencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ip: &str, endpoint: &str, status: Option<i64>) -> LogEntry {
        let entry = LogEntry::new(ip, endpoint);
        match status {
            Some(status) => entry.with_status(status),
            None => entry,
        }
    }

    #[test]
    fn test_table_preserves_first_occurrence_order() {
        let table: FrequencyTable<&str> = ["b", "a", "b", "c", "a", "b"].into_iter().collect();

        let keys: Vec<_> = table.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(table.get("b"), 3);
        assert_eq!(table.get("a"), 2);
        assert_eq!(table.get("missing"), 0);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_occurrence() {
        let table: FrequencyTable<&str> = ["x", "y", "z", "z", "y"].into_iter().collect();

        let ranked = table.most_common(3);
        assert_eq!(ranked, vec![("y", 2), ("z", 2), ("x", 1)]);
    }

    #[test]
    fn test_merge_matches_unsharded_aggregation() {
        let all = ["a", "b", "a", "c", "d", "c", "a"];
        let whole: FrequencyTable<&str> = all.into_iter().collect();

        let mut left: FrequencyTable<&str> = all[..3].iter().copied().collect();
        let right: FrequencyTable<&str> = all[3..].iter().copied().collect();
        left.merge(&right);

        assert_eq!(left, whole);
    }

    #[test]
    fn test_aggregator_counts_each_dimension() {
        let entries = vec![
            entry("1.1.1.1", "/t", Some(200)),
            entry("1.1.1.1", "/t", Some(200)),
            entry("1.1.2.2", "/o", Some(500)),
            entry("1.1.2.2", "/o", None),
        ];

        let frequencies = FrequencyAggregator.analyze(&entries);
        assert_eq!(frequencies.ips.get("1.1.1.1"), 2);
        assert_eq!(frequencies.ips.get("1.1.2.2"), 2);
        assert_eq!(frequencies.endpoints.get("/t"), 2);
        assert_eq!(frequencies.statuses.get(&200), 2);
        assert_eq!(frequencies.statuses.get(&500), 1);
        assert_eq!(frequencies.statuses.total(), 3);
    }

    #[test]
    fn test_aggregator_empty_input() {
        let frequencies = FrequencyAggregator.analyze(&[]);
        assert!(frequencies.ips.is_empty());
        assert!(frequencies.endpoints.is_empty());
        assert!(frequencies.statuses.is_empty());
    }

    #[test]
    fn test_table_serializes_as_ordered_map() {
        let table: FrequencyTable<i64> = [503, 200, 200, 404].into_iter().collect();

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"503":1,"200":2,"404":1}"#);

        let back: FrequencyTable<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
