//! Context extraction — derives a bounded-depth "application context" from a URL.
//!
//! Two URL shapes are understood, and `depth` means something slightly
//! different for each:
//!
//! | Variant | Input | `depth = 0` | `depth = 2` |
//! |---------|-------|-------------|-------------|
//! | [`ContextVariant::PathRooted`] | `/erp/orders/42` | `/` | `/erp/orders` |
//! | [`ContextVariant::Absolute`] | `http://gw:8765/erp/orders/42` | `erp` | `erp/orders/42` |
//!
//! For path-rooted URLs `depth` counts segments after the root slash. For
//! absolute URLs the first path segment is always included and `depth` counts
//! the *additional* segments after it. In both cases the context for a smaller
//! depth is a prefix of the context for a larger one.
//!
//! Any input that does not fit the expected shape yields
//! [`CONTEXT_NOT_FOUND`]; derivation never fails.

use crate::types::CONTEXT_NOT_FOUND;

const ABSOLUTE_PREFIX: &str = "http://";

/// Which URL shape a context is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextVariant {
    /// A bare path such as `/erp/orders`.
    PathRooted,
    /// A full `http://host/...` URL.
    Absolute,
}

impl ContextVariant {
    /// Pick the variant matching the shape of `url`.
    pub fn detect(url: &str) -> Self {
        if url.starts_with(ABSOLUTE_PREFIX) {
            ContextVariant::Absolute
        } else {
            ContextVariant::PathRooted
        }
    }

    /// The depth at which this variant yields exactly one path segment.
    pub fn root_depth(self) -> usize {
        match self {
            ContextVariant::PathRooted => 1,
            ContextVariant::Absolute => 0,
        }
    }
}

/// Derive the context of `url` at `depth`, detecting the URL variant.
pub fn derive_context(url: &str, depth: usize) -> String {
    derive_context_with(url, depth, ContextVariant::detect(url))
}

/// Derive the context of `url` at `depth` using an explicit variant.
pub fn derive_context_with(url: &str, depth: usize, variant: ContextVariant) -> String {
    let derived = match variant {
        ContextVariant::PathRooted => path_rooted(url, depth),
        ContextVariant::Absolute => absolute(url, depth),
    };
    derived.unwrap_or_else(|| CONTEXT_NOT_FOUND.to_string())
}

/// True when the path of `url` lies under `context`.
///
/// Only the path is compared, never the host: `http://erp-gw/crm/x` is not
/// under `erp`. `context` matches whole segments, so `/hr` does not contain
/// `/hrx/people`.
pub fn in_context(url: &str, context: &str) -> bool {
    if context.is_empty() || context == CONTEXT_NOT_FOUND {
        return false;
    }
    let full = derive_context(url, usize::MAX);
    if full == CONTEXT_NOT_FOUND {
        return false;
    }
    match full.strip_prefix(context) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || context.ends_with('/'),
        None => false,
    }
}

fn path_rooted(url: &str, depth: usize) -> Option<String> {
    let rest = url.strip_prefix('/')?;
    let mut context = String::from("/");
    for (i, segment) in rest.split('/').take(depth).enumerate() {
        if segment.is_empty() {
            break;
        }
        if i > 0 {
            context.push('/');
        }
        context.push_str(segment);
    }
    Some(context)
}

fn absolute(url: &str, depth: usize) -> Option<String> {
    let rest = url.strip_prefix(ABSOLUTE_PREFIX)?;
    let (host, path) = rest.split_once('/')?;
    if host.is_empty() {
        return None;
    }

    let mut end = path.find('/').unwrap_or(path.len());
    if end == 0 {
        return None;
    }

    for _ in 0..depth {
        let tail = &path[end..];
        // One or two slashes separate segments; both are preserved verbatim.
        let sep = if tail.starts_with("//") {
            2
        } else if tail.starts_with('/') {
            1
        } else {
            break;
        };
        let segment = &tail[sep..];
        let len = segment
            .find(|c: char| matches!(c, '/' | ',' | ' '))
            .unwrap_or(segment.len());
        if len == 0 {
            break;
        }
        end += sep + len;
    }

    Some(path[..end].to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
