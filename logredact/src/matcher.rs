//! Field-name sensitivity checks.

use crate::policy::FieldMatchMode;

/// Decides whether a field name denotes sensitive data.
///
/// Entries are normalized once at construction, so a lookup only lowercases
/// the candidate name.
#[derive(Clone, Debug)]
pub struct FieldMatcher {
    entries: Vec<String>,
    mode: FieldMatchMode,
}

/// Lowercases a field name and, for exact matching, drops separators so
/// `api_key`, `api-key` and `apiKey` compare equal.
pub(crate) fn normalize_field(name: &str, mode: FieldMatchMode) -> String {
    match mode {
        FieldMatchMode::Contains => name.to_lowercase(),
        FieldMatchMode::Exact => name
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | '.' | ' '))
            .flat_map(char::to_lowercase)
            .collect(),
    }
}

impl FieldMatcher {
    pub fn new<I, S>(fields: I, mode: FieldMatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = fields
            .into_iter()
            .map(|field| normalize_field(field.as_ref().trim(), mode))
            .filter(|field| !field.is_empty())
            .collect();
        entries.sort();
        entries.dedup();
        Self { entries, mode }
    }

    /// Returns `true` when `name` matches any sensitive entry.
    pub fn is_sensitive(&self, name: &str) -> bool {
        if name.is_empty() || self.entries.is_empty() {
            return false;
        }
        let candidate = normalize_field(name, self.mode);
        match self.mode {
            FieldMatchMode::Contains => self
                .entries
                .iter()
                .any(|entry| candidate.contains(entry.as_str())),
            FieldMatchMode::Exact => self.entries.binary_search(&candidate).is_ok(),
        }
    }

    pub fn mode(&self) -> FieldMatchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
