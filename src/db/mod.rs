mod repository;
mod schema;

pub use repository::{Boundary, Repository};
pub use schema::WEATHER_TABLE;
