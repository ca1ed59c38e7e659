mod request;
mod response;

pub use request::FeatureBatch;
pub use response::{HealthResponse, OutcomeResponse};
