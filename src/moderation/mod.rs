// Moderation provider — trait-based abstraction over the remote API.
//
// The Moderator trait defines the interface. CleanModClient implements it
// against the hosted CleanMod API. The filter pipeline only sees the trait,
// so tests (and any future provider) plug in without touching the mapper.

pub mod client;
pub mod traits;

pub use client::CleanModClient;
pub use traits::{Decision, ModerationError, ModerationResult, Moderator};
