pub mod error;
pub mod form;
pub mod gallery;
pub mod instant;
pub mod manager;
pub mod model;
pub mod zone;
