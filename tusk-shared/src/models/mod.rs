pub mod deal;
pub mod passenger;

pub use deal::Deal;
pub use passenger::Passenger;
