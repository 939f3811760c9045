//! # SmartStay
//!
//! Domain library behind the SmartStay backend: text-generation providers and
//! the gateway that reshapes their replies, the AI-backed listing analyses,
//! the travel-time client, and the Supabase-backed operations.

pub mod analysis;
pub mod coerce;
pub mod errors;
pub mod extract;
pub mod gateway;
pub mod prompts;
pub mod providers;
pub mod routing;
pub mod store;

pub use errors::{PromptError, RoutingError, StoreError};
pub use providers::ai::{AiProvider, GenerationRequest};
pub use providers::factory::{create_provider, ProviderSettings};
pub use routing::RoutingClient;
pub use store::SupabaseClient;
