pub mod backend;
pub mod identity;
pub mod records;
pub mod repository;
pub mod services;
pub mod session_store;
