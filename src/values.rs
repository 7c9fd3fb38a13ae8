use std::ops::Index;

use indexmap::IndexMap;

/// Bound variable values: each name maps to an ordered, non-empty list.
///
/// Names compare case-insensitively. The stored spelling comes from the
/// `insert` or first `push` that created the entry. Insertion order of names
/// and of each name's values is kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Values {
    map: IndexMap<String, (String, Vec<String>)>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive variable name comparison.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl Values {
    pub fn new() -> Self {
        Values::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(&fold(name))
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.map.get(&fold(name)).map(|(_, v)| v.as_slice())
    }

    /// Replaces every value bound to `name`. An empty `values` removes it.
    pub fn insert<K, I, V>(&mut self, name: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.remove(&name);
        } else {
            self.map.insert(fold(&name), (name, values));
        }
    }

    /// Appends one value to `name`, keeping any already bound.
    pub fn push<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        self.map
            .entry(fold(&name))
            .or_insert_with(|| (name, Vec::new()))
            .1
            .push(value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.map.shift_remove(&fold(name)).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map
            .values()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(|(name, _)| name.as_str())
    }
}

impl Index<&str> for Values {
    type Output = [String];

    /// Panics if `name` is not bound.
    fn index(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(values) => values,
            None => panic!("no values bound to '{}'", name),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.push(k, v);
        }
    }
}
