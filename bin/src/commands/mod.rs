pub mod access;
pub mod address;
pub mod fetch;
