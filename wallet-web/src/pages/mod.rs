//! Page modules

pub mod greeter;

pub use greeter::GreeterPage;
