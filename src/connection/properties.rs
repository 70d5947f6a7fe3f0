//! Connection properties
//!
//! String-to-string options handed to the driver when a connection is opened.

use std::collections::BTreeMap;

/// Connection options
///
/// Keys listed as associated constants are understood by the built-in
/// drivers. Any other key is kept as-is and forwarded to the driver without
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Character set of the client
    pub const CHARSET: &'static str = "charset";
    /// Client locale
    pub const LOCALE: &'static str = "locale";
    /// Client time zone
    pub const TIME_ZONE: &'static str = "timezone";
    /// User name
    pub const USER: &'static str = "user";
    /// Password
    pub const PASSWORD: &'static str = "password";
    /// Default database
    pub const DBNAME: &'static str = "dbname";

    /// Connection-level keys shared by every driver
    pub const RECOGNIZED: [&'static str; 6] = [
        Self::CHARSET,
        Self::LOCALE,
        Self::TIME_ZONE,
        Self::USER,
        Self::PASSWORD,
        Self::DBNAME,
    ];

    /// Empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Remove a property
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Whether `key` is set
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys outside [`RECOGNIZED`](Self::RECOGNIZED)
    ///
    /// Drivers may still interpret some of them, such as the REST driver's
    /// `useSSL` and `httpConnectTimeout`.
    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|k| !Self::is_recognized(k))
    }

    /// Whether `key` is one of [`RECOGNIZED`](Self::RECOGNIZED)
    pub fn is_recognized(key: &str) -> bool {
        Self::RECOGNIZED.iter().any(|k| *k == key)
    }

    /// Copy every entry of `other` into `self`, overwriting existing keys
    pub fn merge(&mut self, other: &Properties) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    /// Client character set
    pub fn charset(&self) -> Option<&str> {
        self.get(Self::CHARSET)
    }

    /// Client locale
    pub fn locale(&self) -> Option<&str> {
        self.get(Self::LOCALE)
    }

    /// Client time zone
    pub fn timezone(&self) -> Option<&str> {
        self.get(Self::TIME_ZONE)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}
