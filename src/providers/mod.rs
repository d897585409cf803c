// ABOUTME: Identity provider abstraction and the Mattermost implementation
// ABOUTME: Re-exports the provider trait, profile model, and provider errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Provider trait and profile model
pub mod core;
/// Provider error types
pub mod errors;
/// Mattermost OAuth2 provider
pub mod mattermost;

pub use self::core::{IdentityProvider, ProviderProfile};
pub use errors::ProviderError;
pub use mattermost::MattermostProvider;
