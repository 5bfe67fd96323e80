use serde::ser::{Serialize, Serializer};

/// How [`OptionDict::set`] treats a key that is already present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetMode {
    /// Replace the stored value.
    Overwrite,
    /// Concatenate onto the stored value, without a delimiter.
    Append,
}

/// Ordered string-to-string option dictionary with unique keys.
///
/// Keys keep the position of their first insertion. Lookups are linear, which is fine for the
/// handful of options a configuration session collects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionDict {
    entries: Vec<(String, String)>,
}

impl OptionDict {
    /// Empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`.
    pub fn set(&mut self, key: &str, value: &str, mode: SetMode) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => match mode {
                SetMode::Overwrite => {
                    v.clear();
                    v.push_str(value);
                }
                SetMode::Append => v.push_str(value),
            },
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for OptionDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.set(k.as_ref(), v.as_ref(), SetMode::Overwrite);
        }
        dict
    }
}

impl Serialize for OptionDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/options/dict.rs"]
mod tests;
