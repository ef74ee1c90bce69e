pub mod execute;
pub mod schema;
