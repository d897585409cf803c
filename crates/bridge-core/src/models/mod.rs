// ABOUTME: Core data models for the SSO bridge
// ABOUTME: Re-exports local user, role, and exchange session types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Data Models
//!
//! The bridge owns exactly one entity, the [`ExchangeSession`]. Users and roles
//! belong to the record store and are represented here only with the fields
//! the bridge reads or writes.

mod exchange_session;
mod user;

pub use exchange_session::{ExchangeSession, SessionIssue};
pub use user::{LocalUser, ProfileUpdate, Role, UserStatus, UserSummary};
