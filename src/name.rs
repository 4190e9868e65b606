//! GraphQL identifier policy: sanitization, name concatenation, the
//! identifier-field heuristic, and per-run collision suffixing.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

// ------------------------------- Policy ---------------------------------- //

/// Runs of characters GraphQL identifiers cannot contain.
static INVALID_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static EDGE_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^_+|_+$").unwrap());

/// Naming-convention heuristic, not a JSON Schema keyword: `id`, `carId`,
/// `carID` count; `uuid` and `kid` do not. Keep the regex exactly as is,
/// the accepted/rejected cases are load-bearing.
static IDENTIFIER_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^i|I)[dD]$").unwrap());

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Collapse every run of invalid characters to a single `_`, then trim the
/// underscores this may have produced at either end.
pub fn sanitize_name(name: &str) -> String {
    let replaced = INVALID_NAME_CHARS.replace_all(name, "_");
    EDGE_UNDERSCORES.replace_all(&replaced, "").into_owned()
}

/// Title-case each part's first character and join without a separator.
pub fn concat_name(parts: &[&str]) -> String {
    parts.iter().map(|part| ucfirst(part)).collect()
}

pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_identifier_field(key_name: &str) -> bool {
    IDENTIFIER_KEY.is_match(key_name)
}

/// Unique-name allocator for one translation run. The first claim of a base
/// name gets it verbatim; later claims get `Base1`, `Base2`, … Suffixed
/// candidates that happen to collide with an explicitly claimed name skip to
/// the next free integer.
#[derive(Debug, Default)]
pub struct NamePool {
    // base name -> last integer suffix handed out (0 = bare name)
    taken: IndexMap<String, u32>,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base: &str) -> String {
        if !self.taken.contains_key(base) {
            self.taken.insert(base.to_string(), 0);
            return base.to_string();
        }
        let mut n = self.taken[base];
        loop {
            n += 1;
            let candidate = format!("{base}{n}");
            if !self.taken.contains_key(&candidate) {
                self.taken.insert(base.to_string(), n);
                self.taken.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_invalid_runs_to_single_underscore() {
        assert_eq!(sanitize_name("FOO-8_X"), "FOO_8_X");
        assert_eq!(sanitize_name("PIU$#59"), "PIU_59");
        assert_eq!(sanitize_name("already_fine"), "already_fine");
    }

    #[test]
    fn sanitize_trims_edge_underscores() {
        assert_eq!(sanitize_name("-foo-"), "foo");
        assert_eq!(sanitize_name("__bar__"), "bar");
        assert_eq!(sanitize_name("$$$"), "");
    }

    #[test]
    fn sanitize_handles_non_ascii() {
        assert_eq!(sanitize_name("héllo"), "h_llo");
        assert_eq!(sanitize_name("日本語"), "");
    }

    #[test]
    fn concat_title_cases_each_part() {
        assert_eq!(concat_name(&["store", "cars"]), "StoreCars");
        assert_eq!(concat_name(&["StoreCars", "item"]), "StoreCarsItem");
        assert_eq!(concat_name(&["", "x"]), "X");
    }

    #[test]
    fn identifier_field_detection() {
        assert!(is_identifier_field("id"));
        assert!(is_identifier_field("iD"));
        assert!(is_identifier_field("Id"));
        assert!(is_identifier_field("ID"));
        assert!(is_identifier_field("carId"));
        assert!(is_identifier_field("carID"));
        // lowercase interior `i` does not count
        assert!(!is_identifier_field("uuid"));
        assert!(!is_identifier_field("kid"));
        assert!(!is_identifier_field("identifier"));
    }

    #[test]
    fn name_pool_suffixes_collisions() {
        let mut pool = NamePool::new();
        assert_eq!(pool.claim("Car"), "Car");
        assert_eq!(pool.claim("Car"), "Car1");
        assert_eq!(pool.claim("Car"), "Car2");
        assert_eq!(pool.claim("Bike"), "Bike");
    }

    #[test]
    fn name_pool_skips_explicitly_taken_suffixes() {
        let mut pool = NamePool::new();
        assert_eq!(pool.claim("Car1"), "Car1");
        assert_eq!(pool.claim("Car"), "Car");
        assert_eq!(pool.claim("Car"), "Car2");
    }
}
