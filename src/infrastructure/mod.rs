pub mod bootstrap;
pub mod config;
pub mod genlayer;
pub mod rpc;
pub mod wallet;
