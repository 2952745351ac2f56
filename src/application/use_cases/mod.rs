pub mod case_actions;
pub mod case_registry;
pub mod wallet_session;
