// Filter engine - Case-insensitive constituency search
use crate::domain::election::Constituency;

/// Constituencies whose name or code contains `query`, ignoring case, in
/// their original order. An empty query matches everything.
pub fn filter_constituencies<'a>(all: &'a [Constituency], query: &str) -> Vec<&'a Constituency> {
    if query.is_empty() {
        return all.iter().collect();
    }

    let needle = query.to_lowercase();
    all.iter()
        .filter(|c| {
            c.name().to_lowercase().contains(&needle) || c.code().to_lowercase().contains(&needle)
        })
        .collect()
}
