// ABOUTME: HTTP middleware for CORS and request correlation
// ABOUTME: Provides request ID generation and span creation for structured logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// Request IDs and request spans
pub mod request_id;

pub use cors::setup_cors;
pub use request_id::{create_request_span, request_id, MakePrefixedRequestId, REQUEST_ID_HEADER};
