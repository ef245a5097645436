//! Naming-convention helpers for the type registry.
//!
//! Spec tokens arrive in whatever shape the caller wrote them — snake case,
//! camel case, singular, plural. The registry folds everything to the
//! canonical snake-case singular model name, with a pluralized fallback for
//! models that are registered under a plural name.

use convert_case::{Case, Casing};

/// Fold a token to snake case for registry lookup.
pub fn fold(token: &str) -> String {
    token.to_case(Case::Snake)
}

/// Reduce a snake-case token to its singular form.
///
/// This is the small closed rule set the registry needs, not a general
/// English inflector: `clients` -> `client`, `categories` -> `category`,
/// `statuses` -> `status`, `species` -> `species` (unchanged).
pub fn singularize(token: &str) -> String {
    if let Some(stem) = token.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["ches", "shes", "ses", "xes", "zes"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    if token.len() > 1 && token.ends_with('s') && !token.ends_with("ss") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Produce the plural form of a snake-case token.
pub fn pluralize(token: &str) -> String {
    if let Some(stem) = token.strip_suffix('y') {
        let penultimate = stem.chars().last();
        if penultimate.is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}ies");
        }
    }
    if token.ends_with('s')
        || token.ends_with('x')
        || token.ends_with('z')
        || token.ends_with("ch")
        || token.ends_with("sh")
    {
        return format!("{token}es");
    }
    format!("{token}s")
}
