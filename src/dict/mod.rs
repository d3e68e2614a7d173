pub mod builder;
pub mod manager;
