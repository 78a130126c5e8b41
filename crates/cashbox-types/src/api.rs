use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Denomination label → quantity, as sent by the counting frontend.
///
/// Entries keep the order they had in the payload. A repeated label keeps its
/// first position and its last quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(Vec<(String, i64)>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: String, quantity: i64) {
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = quantity,
            None => self.0.push((label, quantity)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.0.iter().map(|(label, quantity)| (label, quantity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a i64);
    type IntoIter = Box<dyn Iterator<Item = (&'a String, &'a i64)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl FromIterator<(String, i64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (label, quantity) in iter {
            counts.insert(label, quantity);
        }
        counts
    }
}

impl<'de> Deserialize<'de> for Counts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = Counts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of denomination labels to integer quantities")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Counts, M::Error> {
                let mut counts = Counts(Vec::with_capacity(map.size_hint().unwrap_or(0)));
                while let Some((label, quantity)) = map.next_entry::<String, i64>()? {
                    counts.insert(label, quantity);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

// -- Auth --

/// Body of `POST /register`. Fields stay optional here so that a missing
/// field is reported by the handler as a validation failure.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Both fields, if present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.username)?, non_empty(&self.password)?))
    }
}

/// Body of `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.username)?, non_empty(&self.password)?))
    }
}

// -- Counts --

/// Body of `POST /submit_counts`. An empty `counts` object is a valid
/// submission; only an absent or null one is missing.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitCountsRequest {
    pub username: Option<String>,
    pub counts: Option<Counts>,
}

impl SubmitCountsRequest {
    pub fn into_parts(self) -> Option<(String, Counts)> {
        let username = self.username.filter(|u| !u.is_empty())?;
        Some((username, self.counts?))
    }
}

// -- Responses --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCountsResponse {
    pub success: bool,
    pub message: String,
    pub total_value: i64,
    pub total_count: i64,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
