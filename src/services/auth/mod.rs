pub mod authority;
pub mod credential;
pub mod factory;
pub mod outcome;

pub use authority::{Authority, HttpAuthority};
pub use credential::{Credential, extract_credential};
pub use factory::build_authority;
pub use outcome::{AuthRejection, AuthorizationOutcome, ProxyDecision};
