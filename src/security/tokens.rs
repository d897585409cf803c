// ABOUTME: Cryptographically secure random token generation
// ABOUTME: Produces URL-safe base64 tokens for CSRF state and exchange codes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bridge_core::constants::oauth::TOKEN_BYTES;
use bridge_core::errors::{AppError, AppResult};
use ring::rand::{SecureRandom, SystemRandom};

/// Generate a token from [`TOKEN_BYTES`] bytes of OS randomness, URL-safe base64 without padding
///
/// # Errors
///
/// Returns an internal error if the system random source fails
pub fn generate_secure_token() -> AppResult<String> {
    generate_token_with_len(TOKEN_BYTES)
}

/// Generate a URL-safe token from `len` random bytes
///
/// # Errors
///
/// Returns an internal error if the system random source fails
pub fn generate_token_with_len(len: usize) -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("system random source unavailable"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
