//! Render address parsing.
//!
//! An address names what to render:
//!
//! | Address | Meaning |
//! |---------|---------|
//! | `pages/home.html` | entry `base` of the page group for `pages/home.html` |
//! | `pages/home.html#footer` | entry `footer` of that page group |
//! | `footer` | entry `footer` of the partials group |
//!
//! Classification is a plain string prefix test against the pages root (the
//! directory part of the pages pattern). Both the root and the page group keys
//! are [cleaned](clean_path), so `./site/pages/*.html` registers
//! `site/pages/home.html` and that is the spelling addresses must use.

use std::path::{Component, Path, PathBuf};

/// A parsed render address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address<'a> {
    /// A page group, optionally narrowed to one entry point.
    Page {
        page: &'a str,
        entry: Option<&'a str>,
    },
    /// An entry point of the partials group.
    Partial(&'a str),
}

impl<'a> Address<'a> {
    /// Classifies `address` against the current pages root.
    ///
    /// The page part is split from the entry on the first `#`; anything after
    /// it, further `#`s included, is the entry name.
    pub fn parse(address: &'a str, pages_root: &str) -> Self {
        if !address.starts_with(pages_root) {
            return Address::Partial(address);
        }
        match address.split_once('#') {
            Some((page, entry)) => Address::Page {
                page,
                entry: Some(entry),
            },
            None => Address::Page {
                page: address,
                entry: None,
            },
        }
    }
}

/// Lexically normalizes a path: drops `.` components and repeated or
/// trailing separators. `..` is kept. An empty result yields `"."`.
pub fn clean_path(path: &str) -> String {
    let cleaned: PathBuf = Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        ".".to_string()
    } else {
        cleaned.to_string_lossy().into_owned()
    }
}

/// Returns the cleaned directory portion of a glob pattern.
///
/// Mirrors the usual `dirname` convention: a pattern without a directory part
/// yields `"."`.
pub fn pattern_root(pattern: &str) -> String {
    match Path::new(pattern).parent() {
        Some(parent) => clean_path(&parent.to_string_lossy()),
        None => ".".to_string(),
    }
}
