pub mod models;
pub mod pii;

pub use models::{Deal, Passenger};
pub use pii::Masked;
