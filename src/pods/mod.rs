pub mod model;
pub mod overview;
pub mod status;
