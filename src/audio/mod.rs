pub mod decoder;
pub mod fetch;
