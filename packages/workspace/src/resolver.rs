//! Logical page path → component file lookup.
//!
//! The mapping is built once from config and shared immutably; no operation
//! mutates it after load.

use std::collections::HashMap;

use pagesmith_editor::DocumentKind;

use crate::config::{ConfigError, ConfigResult, PageEntry};

/// Page that a logical path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage<'a> {
    pub entry: &'a PageEntry,
    pub file: &'a str,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, Default)]
pub struct PageMapping {
    entries: Vec<PageEntry>,
    by_path: HashMap<String, usize>,
}

/// Canonical form of a logical path: leading slash, no trailing slash
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}

impl PageMapping {
    pub fn new(entries: Vec<PageEntry>) -> ConfigResult<Self> {
        let mut by_path = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let key = normalize_path(&entry.path);
            if by_path.insert(key.clone(), index).is_some() {
                return Err(ConfigError::DuplicatePage(key));
            }
        }
        Ok(Self { entries, by_path })
    }

    pub fn resolve(&self, logical_path: &str) -> Option<ResolvedPage<'_>> {
        let index = *self.by_path.get(&normalize_path(logical_path))?;
        let entry = &self.entries[index];
        Some(ResolvedPage {
            entry,
            file: &entry.file,
            kind: entry.kind(),
        })
    }

    /// Configured title, else the last path segment in title case
    pub fn title_for(&self, logical_path: &str) -> String {
        self.resolve(logical_path)
            .and_then(|page| page.entry.title.clone())
            .unwrap_or_else(|| title_from_path(logical_path))
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn title_from_path(logical_path: &str) -> String {
    let segment = logical_path
        .trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if segment.is_empty() {
        return "Home".to_string();
    }

    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
