pub mod use_cases;

pub use use_cases::case_actions::{CaseActions, CreatedCase};
pub use use_cases::case_registry::CaseRegistry;
pub use use_cases::wallet_session::WalletSession;
