pub mod about;
pub mod app;
pub mod error;
pub mod gateway;
pub mod partition;
pub mod sample;
pub mod session;
