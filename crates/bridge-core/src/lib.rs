// ABOUTME: Core types and constants for the Mattermost SSO bridge
// ABOUTME: Foundation crate with error handling, user/session models, and constants
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Bridge Core
//!
//! Foundation crate providing the shared types of the SSO bridge. It changes
//! rarely, so keeping it separate lets the server crate rebuild incrementally.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and `DatabaseError`
//! - **models**: local users, roles, and exchange sessions
//! - **constants**: cookie names, lifetimes, and provider endpoint paths

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (users, roles, exchange sessions)
pub mod models;
