// Descriptors for addressable entities and paginated collections.
//
// Each entity family shares one operation shape (Create, Get, Update,
// Delete, List) that differs only in names: the operation stem, the id
// member, the response key and the update payload. These traits carry those
// names as constants so the envelopes can be written once.

use crate::update::UpdateValue;
use crate::validation::{Validate, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// An entity addressable by a service-assigned id.
pub trait Entity:
    Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Operation stem, e.g. `ByteMatchSet` in `CreateByteMatchSet`.
    const NAME: &'static str;
    /// Stem of the list operation, e.g. `ByteMatchSets` in `ListByteMatchSets`.
    const PLURAL: &'static str;
    /// Member holding the id in requests and in the entity itself.
    const ID_FIELD: &'static str;
    /// Member holding the entity in Create and Get responses.
    const KEY: &'static str;
    /// Whether an update request may omit `Updates` and change only its
    /// extra members.
    const UPDATES_OPTIONAL: bool = false;

    /// Entry returned by the list operation.
    type Summary: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync;
    /// Value carried by each update envelope.
    type Change: UpdateValue;
    /// Body of the create request, without the change token.
    type Spec: Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq;
    /// Members of the update request besides the id and the updates.
    type Extras: Serialize + DeserializeOwned + Validate + Default + Clone + Debug + PartialEq;

    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
    fn summary(&self) -> Self::Summary;
}

/// A paginated collection.
pub trait Listing: 'static {
    /// Operation name, e.g. `ListIPSets`.
    const OPERATION: &'static str;
    /// Member holding the page items in the response.
    const KEY: &'static str;

    type Item: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync;
    /// Members of the list request besides `Limit` and `NextMarker`.
    type Scope: Serialize + DeserializeOwned + Validate + Default + Clone + Debug + PartialEq;
}

/// Update requests of most entities carry nothing besides the id and the
/// updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoExtras {}

impl Validate for NoExtras {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Lists that span the whole account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscoped {}

impl Validate for Unscoped {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Implements `Listing` for an entity's list operation.
macro_rules! entity_listing {
    ($entity:ty, $operation:expr, $key:expr) => {
        impl $crate::entity::Listing for $entity {
            const OPERATION: &'static str = $operation;
            const KEY: &'static str = $key;

            type Item = <$entity as $crate::entity::Entity>::Summary;
            type Scope = $crate::entity::Unscoped;
        }
    };
}

pub(crate) use entity_listing;
