//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, allow-list, and URL resolution tests
//! - `request_building`: Merging overrides with the event payload

mod helpers;
