mod fields;
mod health;
mod satellite;

pub use fields::{create_fields, fields_intersect, list_fields};
pub use health::health_check;
pub use satellite::{satellite_image, satellite_image_report};
