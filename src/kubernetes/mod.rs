pub mod error;
pub mod kubers;
pub mod model;
#[cfg(test)]
pub mod stubs;
pub mod token;
