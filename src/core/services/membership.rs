//! Idempotent many-to-many links

use crate::infrastructure::error::StoreError;
use crate::infrastructure::repositories::{Filter, Repository};
use crate::infrastructure::traits::{Membership, Record};
use log::debug;

fn pair<L: Membership>(parent_id: i64, member_id: i64) -> Filter {
    Filter::new()
        .eq(L::PARENT, parent_id)
        .eq(L::MEMBER, member_id)
}

/// Returns the active link for the pair, creating it only if needed.
///
/// An active link is returned unchanged. Otherwise a soft-deleted link for the
/// same pair is restored, keeping its id and creation time. A new row is
/// written only when neither exists.
pub async fn ensure_link<L: Membership>(
    repo: &Repository<L>,
    parent_id: i64,
    member_id: i64,
) -> Result<L, StoreError> {
    if let Some(link) = repo.list(pair::<L>(parent_id, member_id)).await?.into_iter().next() {
        return Ok(link);
    }

    for link in repo.deleted(pair::<L>(parent_id, member_id)).await? {
        if let Some(restored) = repo.restore(link.id()).await? {
            debug!(
                "restored {} link {} -> {}",
                L::TABLE,
                restored.parent_id(),
                restored.member_id()
            );
            return Ok(restored);
        }
    }

    repo.create(L::link(parent_id, member_id)).await
}

/// Soft-deletes the active link for the pair, if there is one.
pub async fn remove_link<L: Membership>(
    repo: &Repository<L>,
    parent_id: i64,
    member_id: i64,
) -> Result<Option<L>, StoreError> {
    match repo.list(pair::<L>(parent_id, member_id)).await?.into_iter().next() {
        Some(link) => repo.delete(link.id()).await,
        None => Ok(None),
    }
}

/// Active links of a parent.
pub async fn links_of<L: Membership>(
    repo: &Repository<L>,
    parent_id: i64,
) -> Result<Vec<L>, StoreError> {
    repo.list(Filter::new().eq(L::PARENT, parent_id)).await
}
