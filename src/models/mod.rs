//! Models module for the SDK
//!
//! Defines the normalized schema model reconstructed from a geodatabase
//! catalog. All types are serializable so the model can be handed to report,
//! CLI and HTTP layers unchanged.

pub mod domain;
pub mod field;
pub mod item;
pub mod relationship;
pub mod schema;
pub mod spatial_reference;

pub use domain::{CodedValue, Domain, DomainType, RangeValue};
pub use field::{Field, FieldDefault, Subtype};
pub use item::{Item, ItemKind};
pub use relationship::{RelationshipClass, RelationshipRule};
pub use schema::SchemaModel;
pub use spatial_reference::SpatialReference;
