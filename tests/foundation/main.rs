//! Integration tests for Layer 0: Foundation
//!
//! Tests for persistent id lists and entity maps, identity checks, patches
//! and errors.
