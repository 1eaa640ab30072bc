//! Resource address resolution
//!
//! Splits a plan address such as `module.db.module.subnet.aws_subnet.private[0]`
//! into the resource type and name it refers to.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `[0]`, `["key"]` and `["a.b]c"]` instance keys
    static ref INDEX_PATTERN: Regex =
        Regex::new(r#"\[(?:"[^"]*"|[^\]]*)\]"#).expect("Invalid index pattern regex");
}

const MODULE_SEGMENT: &str = "module";
const DATA_SEGMENT: &str = "data";

/// Remove every `count`/`for_each` instance key from an address
pub fn strip_indices(address: &str) -> String {
    INDEX_PATTERN.replace_all(address, "").into_owned()
}

/// Resolve an address into `(resource_type, resource_name)`.
///
/// Module segments are skipped, so nested modules resolve to the innermost
/// resource. A `data.` prefix stays part of the type. Never fails: addresses
/// that contain no recognisable resource fall back to their last segments.
pub fn resolve_address(address: &str) -> (String, String) {
    let cleaned = strip_indices(address.trim());

    if cleaned.starts_with("module.") {
        return resolve_module_address(&cleaned);
    }

    if let Some(rest) = cleaned.strip_prefix("data.") {
        return match rest.split_once('.') {
            Some((data_type, name)) => (format!("data.{}", data_type), name.to_string()),
            None => (cleaned.clone(), String::new()),
        };
    }

    match cleaned.split_once('.') {
        Some((resource_type, name)) => (resource_type.to_string(), name.to_string()),
        None => (cleaned, String::new()),
    }
}

fn resolve_module_address(cleaned: &str) -> (String, String) {
    let parts: Vec<&str> = cleaned.split('.').collect();

    let mut i = 0;
    while i < parts.len() {
        let part = parts[i];

        if part == MODULE_SEGMENT {
            // Skip the module keyword and the module's own name
            i += 2;
            continue;
        }

        if part == DATA_SEGMENT && i + 2 < parts.len() {
            return (format!("data.{}", parts[i + 1]), parts[i + 2].to_string());
        }

        // Provider resource types always carry an underscore
        if part.contains('_') && i + 1 < parts.len() {
            return (part.to_string(), parts[i + 1].to_string());
        }

        i += 1;
    }

    match parts.as_slice() {
        [.., resource_type, name] => (resource_type.to_string(), name.to_string()),
        [single] => (single.to_string(), String::new()),
        [] => (String::new(), String::new()),
    }
}
