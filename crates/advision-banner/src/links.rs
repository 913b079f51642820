//! Banner label to web link lookup, used to texture overlays.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct LinkTable {
    links: BTreeMap<String, String>,
}

impl Default for LinkTable {
    fn default() -> Self {
        Self::from_pairs([
            ("beeline", "www.beeline.ru"),
            ("mtc", "www.mts.ru"),
            ("tele2", "www.tele2.ru"),
            ("megafon", "www.megafon.ru"),
        ])
    }
}

impl From<BTreeMap<String, String>> for LinkTable {
    fn from(raw: BTreeMap<String, String>) -> Self {
        Self::from_pairs(raw.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl From<LinkTable> for BTreeMap<String, String> {
    fn from(table: LinkTable) -> Self {
        table.links
    }
}

impl LinkTable {
    pub fn empty() -> Self {
        Self {
            links: BTreeMap::new(),
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::empty();
        for (label, url) in pairs {
            table.insert(label, url);
        }
        table
    }

    /// Labels are stored lowercase.
    pub fn insert(&mut self, label: &str, url: &str) {
        self.links.insert(label.to_lowercase(), url.to_string());
    }

    /// Case-insensitive lookup.
    pub fn url_for(&self, label: &str) -> Option<&str> {
        self.links.get(&label.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
