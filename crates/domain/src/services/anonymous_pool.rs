//! Reserved usernames for anonymous readers.
//!
//! Anonymous readers cannot choose a free-form username; they pick one of a
//! small fixed set of names. Which names are still free is recomputed from
//! the currently assigned usernames on every query, so a name becomes
//! available again as soon as its account is removed or renamed.

use std::collections::HashSet;

/// The reserved pool, in lexicographic order.
pub const ANONYMOUS_USERNAMES: [&str; 21] = [
    "ahven",
    "angerjas",
    "forell",
    "hai",
    "haigur",
    "hani",
    "haug",
    "heeringas",
    "kajakas",
    "kilu",
    "koha",
    "kurg",
    "lest",
    "luik",
    "ogalik",
    "part",
    "pelikan",
    "tiir",
    "tursk",
    "tuun",
    "viires",
];

/// Recipient name recorded on invites issued to anonymous invitees.
pub const ANONYMOUS_RECIPIENT_NAME: &str = "Anonüümne";

/// Returns true if `name` belongs to the reserved pool.
pub fn is_reserved_name(name: &str) -> bool {
    ANONYMOUS_USERNAMES.contains(&name)
}

/// Reserved names not present in `assigned`, sorted lexicographically.
pub fn available_names(assigned: &HashSet<String>) -> Vec<String> {
    let mut names: Vec<String> = ANONYMOUS_USERNAMES
        .iter()
        .filter(|name| !assigned.contains(**name))
        .map(|name| name.to_string())
        .collect();
    names.sort_unstable();
    names
}
