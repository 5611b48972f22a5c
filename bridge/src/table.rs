//! # Entity Table Module
//!
//! Insertion-ordered storage for one entity type, and the cursor paging
//! every list operation of the service shares.
//!
//! A page cursor is the key of the first item of the next page, wrapped in
//! an opaque `NextMarker`. A marker whose key is gone fails the list call
//! with `InvalidParameter` / `NEXT_MARKER`.

use indexmap::IndexMap;
use waf_model::{
    Entity, NextMarker, ParameterExceptionField, ParameterExceptionReason, ServiceError,
};

// ================================================================================================
// PAGING
// ================================================================================================

/// Slices `keyed` (in service order) into one page starting at `marker`.
///
/// Returns the page items and the marker of the following page, if any.
pub fn paginate<T>(
    keyed: Vec<(String, T)>,
    marker: Option<&NextMarker>,
    page_size: usize,
) -> Result<(Vec<T>, Option<NextMarker>), ServiceError> {
    let start = match marker {
        None => 0,
        Some(marker) => keyed
            .iter()
            .position(|(key, _)| key == marker.resolve())
            .ok_or_else(|| {
                ServiceError::invalid_parameter(
                    ParameterExceptionField::NextMarker,
                    ParameterExceptionReason::IllegalArgument,
                    marker.resolve(),
                )
            })?,
    };

    let mut rest = keyed.into_iter().skip(start);
    let items: Vec<T> = rest.by_ref().take(page_size).map(|(_, item)| item).collect();
    let next = rest.next().map(|(key, _)| NextMarker::mint(key));
    Ok((items, next))
}

// ================================================================================================
// ENTITY TABLE
// ================================================================================================

/// All entities of one type, keyed by id, in creation order.
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: IndexMap<String, E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.rows.get(id)
    }

    /// Stores `entity` under its id, replacing any previous version in place.
    pub fn put(&mut self, entity: E) {
        if let Some(id) = entity.id() {
            self.rows.insert(id.to_string(), entity);
        }
    }

    /// Removes an entity, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<E> {
        self.rows.shift_remove(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    /// One page of summaries.
    pub fn page(
        &self,
        marker: Option<&NextMarker>,
        page_size: usize,
    ) -> Result<(Vec<E::Summary>, Option<NextMarker>), ServiceError> {
        let keyed = self
            .rows
            .iter()
            .map(|(id, entity)| (id.clone(), entity.summary()))
            .collect();
        paginate(keyed, marker, page_size)
    }
}
