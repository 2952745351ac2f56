pub mod address;
pub mod case;
pub mod chain;
pub mod error;
pub mod requests;
