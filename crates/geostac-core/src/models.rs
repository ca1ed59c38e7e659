pub mod feature;
pub mod field;

pub use feature::{features_from_collection, PolygonFeature, Ring};
pub use field::{Field, FieldId, FieldRecord, Imagery, Insertion, NewField};
