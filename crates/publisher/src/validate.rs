//! Validation step: host-independent checks an instance must pass before it
//! is uploaded. A failed instance is skipped with its reasons listed; it never
//! aborts the whole run.

use once_cell::sync::Lazy;
use regex::Regex;

use common::families::{families_for_extension, Family};

use crate::collect::Instance;

/// Asset names start with an uppercase letter, then letters/digits/underscores.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap());

/// Texture uploads beyond this size are rejected before hitting the server.
pub const MAX_TEXTURE_FILE_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Violation {
    pub rule: &'static str,
    pub message: String,
}

fn violation(rule: &'static str, message: impl Into<String>) -> Violation {
    Violation { rule, message: message.into() }
}

pub fn validate(instance: &Instance) -> Vec<Violation> {
    let mut violations = Vec::new();

    let family = match Family::parse(&instance.family) {
        Some(f) => f,
        None => {
            violations.push(violation("family", format!("unknown family {:?}", instance.family)));
            return violations;
        }
    };

    if instance.files.is_empty() {
        violations.push(violation("empty-instance", "no export files collected"));
    }

    if !NAME_PATTERN.is_match(&instance.name) {
        violations.push(violation(
            "naming",
            format!("asset name {:?} must match {}", instance.name, NAME_PATTERN.as_str()),
        ));
    }

    for file in &instance.files {
        let ext = file
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if !family.allows_extension(&ext) {
            let fits: Vec<&str> =
                families_for_extension(&ext).iter().map(|f| f.as_str()).collect();
            let hint = if fits.is_empty() {
                String::new()
            } else {
                format!(" (accepted by: {})", fits.join(", "))
            };
            violations.push(violation(
                "extension",
                format!("{} is not a {} format{hint}", file.path.display(), family.as_str()),
            ));
        }
        if family == Family::Texture && file.size_bytes > MAX_TEXTURE_FILE_BYTES {
            violations.push(violation(
                "file-size",
                format!("{} exceeds the texture size cap", file.path.display()),
            ));
        }
    }

    violations
}
