pub mod loader;
pub mod schema;

pub use loader::{load_farm_data, DataLoadError, FarmData};
