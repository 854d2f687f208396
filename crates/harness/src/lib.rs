pub mod fixtures;
pub mod kitchen;

pub use fixtures::date;
pub use kitchen::TestKitchen;
