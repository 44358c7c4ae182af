//! AI Response Validation
//!
//! Provider answers are JSON-ish text. This layer turns them into
//! `serde_json::Value` through a finite, two-stage repair.

mod json_repair;

pub use json_repair::{
    JsonRepairer, escape_bare_whitespace,
    extract_json_with_repair_status, strip_code_fences,
};
