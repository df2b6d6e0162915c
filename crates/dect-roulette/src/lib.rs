//! DECT Roulette - random one-on-one pairing of DECT phone numbers.
//!
//! Callers register their DECT number and are handed a partner to call:
//! - Newcomers are offered to others first through a priority queue
//! - Everyone else is drawn from a shuffled round-robin queue
//! - Moderators can ban numbers through a token-gated admin endpoint
//! - Membership is written to a JSON snapshot after every change

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod secret;

pub use config::Config;
pub use error::RouletteError;
pub use registry::{Partner, Registry, Snapshot, Store};
pub use secret::AdminToken;
