use serde::Serialize;

use crate::domain::supplier::Supplier;
use crate::domain::types::SupplierId;
use crate::dto::suppliers::SelectionPageData;
use crate::repository::SupplierReader;
use crate::selection::{BoundedSelectionSet, Capacity, SelectionStorage};
use crate::services::ServiceResult;

/// What a toggle did to a selection set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Added,
    Removed,
    CapacityExceeded { capacity: usize },
}

fn toggle<S>(set: BoundedSelectionSet<'_, S>, id: &SupplierId) -> SelectionOutcome
where
    S: SelectionStorage + ?Sized,
{
    if set.has(id.as_str()) {
        set.remove(id.as_str());
        return SelectionOutcome::Removed;
    }

    if set.add(id.as_str()) {
        return SelectionOutcome::Added;
    }

    match set.capacity() {
        Capacity::AtMost(capacity) => SelectionOutcome::CapacityExceeded { capacity },
        // Only a concurrent writer can make an unbounded add fail; the id is
        // present either way.
        Capacity::Unbounded => SelectionOutcome::Added,
    }
}

pub fn toggle_favorite<S>(storage: &S, id: &SupplierId) -> SelectionOutcome
where
    S: SelectionStorage + ?Sized,
{
    toggle(BoundedSelectionSet::favorites(storage), id)
}

pub fn toggle_compare<S>(storage: &S, id: &SupplierId) -> SelectionOutcome
where
    S: SelectionStorage + ?Sized,
{
    toggle(BoundedSelectionSet::compare(storage), id)
}

pub fn clear_compare<S>(storage: &S)
where
    S: SelectionStorage + ?Sized,
{
    BoundedSelectionSet::compare(storage).clear();
}

/// Ids currently in the favourites and compare sets, for marking cards.
pub fn selected_ids<S>(storage: &S) -> (Vec<String>, Vec<String>)
where
    S: SelectionStorage + ?Sized,
{
    (
        BoundedSelectionSet::favorites(storage).get(),
        BoundedSelectionSet::compare(storage).get(),
    )
}

async fn load_set<R, S>(repo: &R, set: BoundedSelectionSet<'_, S>) -> ServiceResult<SelectionPageData>
where
    R: SupplierReader + ?Sized,
    S: SelectionStorage + ?Sized,
{
    let ids = set.get();
    let suppliers: Vec<Supplier> = repo.list_suppliers_by_ids(&ids).await.map_err(|err| {
        log::error!("Failed to load suppliers for {}: {err}", set.key());
        err
    })?;

    Ok(SelectionPageData {
        suppliers,
        capacity: match set.capacity() {
            Capacity::AtMost(capacity) => Some(capacity),
            Capacity::Unbounded => None,
        },
        can_add: set.can_add(),
    })
}

pub async fn load_favorites<R, S>(repo: &R, storage: &S) -> ServiceResult<SelectionPageData>
where
    R: SupplierReader + ?Sized,
    S: SelectionStorage + ?Sized,
{
    load_set(repo, BoundedSelectionSet::favorites(storage)).await
}

pub async fn load_compare<R, S>(repo: &R, storage: &S) -> ServiceResult<SelectionPageData>
where
    R: SupplierReader + ?Sized,
    S: SelectionStorage + ?Sized,
{
    load_set(repo, BoundedSelectionSet::compare(storage)).await
}
