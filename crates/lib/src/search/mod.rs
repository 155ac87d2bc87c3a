//! Filtering and sorting of the catalog and the contact directory.
//!
//! Everything here is a pure derivation: the inputs are never modified
//! and results are recomputed from scratch whenever a criterion changes.
//! Filters preserve input order; sorts are stable, so ties keep it too.

mod criteria;
mod errors;


use std::cmp::Ordering;
use std::collections::HashMap;

pub use criteria::{CategoryFilter, InvestmentRange, SearchCriteria, SortOrder};
pub use errors::SearchError;

use crate::Id;
use crate::catalog::{Catalog, Contact, Startup};

/// Startups matching every criterion, in catalog order.
pub fn filter_startups<'a>(startups: &'a [Startup], criteria: &SearchCriteria) -> Vec<&'a Startup> {
    let needle = criteria.term.trim().to_lowercase();
    let result: Vec<&Startup> = startups
        .iter()
        .filter(|s| matches_term(s, &needle))
        .filter(|s| criteria.category.matches(&s.category))
        .filter(|s| criteria.range.contains(s.requested_amount))
        .collect();
    tracing::debug!(
        term = %criteria.term,
        category = %criteria.category,
        range = %criteria.range,
        matched = result.len(),
        total = startups.len(),
        "Filtered catalog"
    );
    result
}

fn matches_term(startup: &Startup, needle: &str) -> bool {
    needle.is_empty()
        || startup.name.to_lowercase().contains(needle)
        || startup.description.to_lowercase().contains(needle)
}

/// Reorder filtered startups using their linked contact's activity.
///
/// Startups without a contact count as never active and never unread.
pub fn sort_startups(results: &mut [&Startup], order: SortOrder, contacts: &[Contact]) {
    let by_startup: HashMap<&Id, &Contact> = contacts
        .iter()
        .filter_map(|c| c.startup_id.as_ref().map(|id| (id, c)))
        .collect();
    let activity = |s: &Startup| by_startup.get(&s.id).map_or(0, |c| c.last_activity_millis());
    let unread = |s: &Startup| by_startup.get(&s.id).map_or(0, |c| c.unread);

    match order {
        SortOrder::Recent => results.sort_by(|a, b| activity(b).cmp(&activity(a))),
        SortOrder::Unread => results.sort_by(|a, b| unread(b).cmp(&unread(a))),
        SortOrder::Alphabetical => results.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// Filter and optionally sort the catalog.
pub fn search_catalog<'a>(
    catalog: &'a Catalog,
    criteria: &SearchCriteria,
    order: Option<SortOrder>,
) -> Vec<&'a Startup> {
    let mut results = filter_startups(catalog.startups(), criteria);
    if let Some(order) = order {
        sort_startups(&mut results, order, &catalog.contacts());
    }
    results
}

/// Contacts whose name, or linked startup's name, contains `query`.
pub fn filter_contacts(catalog: &Catalog, query: &str) -> Vec<Contact> {
    let needle = query.trim().to_lowercase();
    catalog
        .contacts()
        .into_iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.startup_id
                    .as_ref()
                    .and_then(|id| catalog.startup(id).ok())
                    .is_some_and(|s| s.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort contacts in place.
pub fn sort_contacts(contacts: &mut [Contact], order: SortOrder) {
    match order {
        SortOrder::Recent => {
            contacts.sort_by(|a, b| b.last_activity_millis().cmp(&a.last_activity_millis()))
        }
        SortOrder::Unread => contacts.sort_by(|a, b| b.unread.cmp(&a.unread)),
        SortOrder::Alphabetical => contacts.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// Conversation index: filtered contacts in the requested order.
pub fn contact_directory(catalog: &Catalog, query: &str, order: SortOrder) -> Vec<Contact> {
    let mut contacts = filter_contacts(catalog, query);
    sort_contacts(&mut contacts, order);
    contacts
}

/// Ascending name order that ignores case first.
///
/// "alpha" and "Alpha" sort next to each other, with the raw string as a
/// tie-break so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}
