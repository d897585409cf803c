// ABOUTME: Security primitives for the OAuth handshake
// ABOUTME: Random token generation and hardened cookie construction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Security
//!
//! CSRF state values and exchange codes come from [`tokens::generate_secure_token`];
//! the state travels to the browser only through [`cookies`].

/// Secure cookie construction and parsing
pub mod cookies;
/// Cryptographically random URL-safe tokens
pub mod tokens;

pub use tokens::generate_secure_token;
