pub mod authorizer;
pub mod bearer;
pub mod cache;
pub mod certificate;
pub mod decision;
pub mod factory;
pub mod failure;
pub mod key_set;
pub mod provider;
pub mod token;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::{Authorizer, AuthorizerConfig};
pub use decision::{Decision, Effect};
pub use factory::build_authorizer;
pub use failure::{AuthFailure, ClaimIssue};
pub use key_set::KeySet;
pub use provider::KeySetProvider;
pub use verify::{TokenPolicy, VerifiedClaims};
