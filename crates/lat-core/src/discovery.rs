//! Discovery — the option lists a caller offers before projecting.
//!
//! A typical session narrows down in two steps: pick one of the
//! [`root_contexts`], then pick one of the [`urls_for_context`] to analyse.

use std::collections::BTreeSet;

use crate::{
    context::{derive_context, in_context, ContextVariant},
    types::{RawRecord, CONTEXT_NOT_FOUND},
};

/// Sorted, de-duplicated first-segment contexts of every resolvable URL.
pub fn root_contexts(records: &[RawRecord]) -> Vec<String> {
    let roots: BTreeSet<String> = records
        .iter()
        .filter_map(RawRecord::resolve_url)
        .map(|url| derive_context(&url, ContextVariant::detect(&url).root_depth()))
        .filter(|ctx| ctx != CONTEXT_NOT_FOUND)
        .collect();
    roots.into_iter().collect()
}

/// Sorted, de-duplicated resolved URLs whose path lies under `context`.
pub fn urls_for_context(records: &[RawRecord], context: &str) -> Vec<String> {
    let urls: BTreeSet<String> = records
        .iter()
        .filter_map(RawRecord::resolve_url)
        .filter(|url| in_context(url, context))
        .collect();
    urls.into_iter().collect()
}
