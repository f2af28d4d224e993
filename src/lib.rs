pub mod configuration;
pub mod extensions;
pub mod kubernetes;
pub mod namespace;
pub mod pods;
