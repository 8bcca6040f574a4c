//! Randomizer Identity Layer
//!
//! Identity for the Randomizer backend is delegated to a hosted user pool.
//! This crate is the only place that speaks the pool's wire protocol; the
//! rest of the workspace sees a small gateway surface:
//!
//! - [`ProviderClient`]: signup, confirmation, sign-in, global sign-out
//! - [`TokenValidator`]: RS256 validation against the pool's published keys
//! - [`LocalAuth`]: HS256 issuance for pre-delegation deployments
//! - [`AuthStrategy`]: picks exactly one of the two per deployment
//!
//! Provider failures are translated into [`IdentityError`] before they leave
//! this crate; unmapped exception names surface as `Upstream` and never leak
//! verbatim to clients.

pub mod claims;
pub mod config;
pub mod error;
pub mod jwks;
pub mod local;
pub mod provider;
pub mod secret_hash;
pub mod strategy;

pub use claims::{TokenClaims, TokenPair};
pub use config::{LocalAuthConfig, ProviderConfig};
pub use error::{IdentityError, IdentityResult};
pub use jwks::TokenValidator;
pub use local::LocalAuth;
pub use provider::{ProviderClient, SignupOutcome};
pub use secret_hash::secret_hash;
pub use strategy::AuthStrategy;
