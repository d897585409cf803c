// ABOUTME: Configuration management for the SSO bridge
// ABOUTME: Exposes the environment-driven server configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration module
//!
//! The binary reads [`ServerConfig`] once at startup and hands it to every
//! constructor that needs it; no module reads the environment on its own.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, MattermostConfig, ServerConfig,
};
