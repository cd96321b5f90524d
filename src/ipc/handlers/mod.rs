pub mod core;
pub mod entities;
pub mod session;
