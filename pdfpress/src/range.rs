//! Page range expressions.
//!
//! Turns a human-entered expression such as `"1-3, 5, 8-10"` into the set of
//! zero-based page indices it selects within a document of a given length.
//!
//! The parser is forgiving by design of the input surface: malformed tokens
//! and page numbers outside the document are dropped instead of rejected, and
//! only an expression that selects nothing at all is an error.
//!
//! # Examples
//!
//! ```
//! use pdfpress::range::parse_page_range;
//!
//! let pages = parse_page_range("3, 1-2, x, 40", 5).unwrap();
//! assert_eq!(pages.as_slice(), &[0, 1, 2]);
//! ```

use std::collections::BTreeSet;

use crate::error::{PdfPressError, Result};

/// Strictly ascending, duplicate-free zero-based page indices.
///
/// Only [`parse_page_range`] constructs non-empty sets, so every index is
/// below the page count the expression was parsed against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct PageIndexSet {
    indices: Vec<usize>,
}

impl PageIndexSet {
    /// The selected indices in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false for sets produced by [`parse_page_range`].
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check whether a zero-based index is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Iterate over the selected indices in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.indices.iter()
    }

    /// One-based page numbers, as a user would write them.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.indices.iter().map(|index| index + 1).collect()
    }

    /// Consume the set, returning the indices.
    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }
}

impl<'a> IntoIterator for &'a PageIndexSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

/// Parse a page range expression against a document with `page_count` pages.
///
/// The expression is a comma-separated list of tokens, each either a single
/// one-based page number (`"4"`) or an inclusive range (`"2-6"`). Ranges are
/// direction-agnostic: `"6-2"` selects the same pages as `"2-6"`. Tokens that
/// are not integers are skipped, as are page numbers outside `1..=page_count`.
///
/// # Errors
///
/// Returns [`PdfPressError::InvalidRange`] when no page is selected.
///
/// # Examples
///
/// ```
/// use pdfpress::range::parse_page_range;
///
/// assert_eq!(parse_page_range("2-1", 5).unwrap().as_slice(), &[0, 1]);
/// assert!(parse_page_range("99", 5).is_err());
/// ```
pub fn parse_page_range(expr: &str, page_count: usize) -> Result<PageIndexSet> {
    let mut selected = BTreeSet::new();

    for token in expr.split(',').map(str::trim) {
        match parse_token(token) {
            Some(Token::Single(page)) => {
                if let Some(index) = to_index(page, page_count) {
                    selected.insert(index);
                }
            }
            Some(Token::Range(start, end)) => {
                let low = start.min(end).max(1);
                let high = start.max(end).min(page_count as i64);
                for page in low..=high {
                    if let Some(index) = to_index(page, page_count) {
                        selected.insert(index);
                    }
                }
            }
            None => {
                if !token.is_empty() {
                    log::debug!("Skipping unrecognized page range token: {token}");
                }
            }
        }
    }

    if selected.is_empty() {
        return Err(PdfPressError::InvalidRange {
            range: expr.to_string(),
            total_pages: page_count,
        });
    }

    Ok(PageIndexSet {
        indices: selected.into_iter().collect(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Single(i64),
    Range(i64, i64),
}

fn parse_token(token: &str) -> Option<Token> {
    if token.contains('-') {
        // Only the first two hyphen-separated parts count: "1-2-3" reads as "1-2".
        let mut bounds = token.split('-').map(str::trim);
        let start = bounds.next()?.parse().ok()?;
        let end = bounds.next()?.parse().ok()?;
        Some(Token::Range(start, end))
    } else {
        token.parse().ok().map(Token::Single)
    }
}

fn to_index(page: i64, page_count: usize) -> Option<usize> {
    let page = usize::try_from(page).ok()?;
    (1..=page_count).contains(&page).then(|| page - 1)
}
