// ABOUTME: Shared utilities used across the bridge
// ABOUTME: Currently hosts outbound HTTP client construction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Outbound HTTP client construction with timeout presets
pub mod http_client;
