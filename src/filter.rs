//! Finger-extension filtering of the selectable catalog.

use crate::catalog::{CatalogItem, CatalogProvider};
use crate::flags::FingerFlags;

/// Recompute the effective catalog for the current hand flag.
///
/// An item is dropped when a required-open finger is not open or a
/// required-closed finger is not closed; items without constraints always
/// survive. The result is a subsequence of the full catalog, relative order
/// preserved.
pub fn recompute<P: CatalogProvider + ?Sized>(
    provider: &P,
    full_catalog: &[CatalogItem],
    flags: FingerFlags,
) -> Vec<CatalogItem> {
    full_catalog
        .iter()
        .filter(|item| {
            let c = provider.constraints(&item.name);
            if let Some(open) = c.must_be_open {
                if open.0 & flags.0 != open.0 {
                    return false;
                }
            }
            if let Some(closed) = c.must_be_closed {
                if closed.0 & !flags.0 != closed.0 {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}
