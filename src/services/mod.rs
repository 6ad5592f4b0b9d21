// src/services/mod.rs
//
// Clients for the external collaborators this API delegates to

pub mod identity;
pub mod supabase;

pub use identity::{AuthSession, Credentials, IdentityProvider, ProviderError, UnconfiguredProvider};
pub use supabase::SupabaseAuthClient;
