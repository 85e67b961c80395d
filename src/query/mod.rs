pub mod error;
pub mod point;
pub mod range;
pub mod resolver;
