// ABOUTME: OAuth 2.0 client used to talk to the upstream identity provider
// ABOUTME: Builds authorization URLs and exchanges authorization codes for tokens
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # OAuth 2.0 Client Module
//!
//! The bridge is an OAuth 2.0 client of the chat server. This module covers the
//! authorization-code grant only: no PKCE, no refresh, no token storage. The
//! access token lives for the duration of a single callback request.

/// Core OAuth 2.0 client implementation
pub mod client;

pub use client::{OAuth2Client, OAuth2Config, OAuth2Token};
