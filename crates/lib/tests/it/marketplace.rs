use dealsdive::{
    FixedClock, Id, Marketplace,
    catalog::Startup,
    search::{
        CategoryFilter, InvestmentRange, SearchCriteria, SortOrder, filter_startups,
        search_catalog,
    },
};

use crate::helpers::TestContext;

fn ids(results: &[&Startup]) -> Vec<String> {
    results.iter().map(|s| s.id.to_string()).collect()
}

#[test]
fn test_eco_search_with_all_and_any() {
    let ctx = TestContext::new();
    let criteria = SearchCriteria::new()
        .with_term("Eco")
        .with_category(CategoryFilter::parse("All Industries"))
        .with_range(InvestmentRange::from_label("Any Amount").unwrap());
    let results = filter_startups(ctx.marketplace.catalog().startups(), &criteria);

    let expected: Vec<String> = ctx
        .marketplace
        .catalog()
        .startups()
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains("eco") || s.description.to_lowercase().contains("eco")
        })
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(ids(&results), expected);
    assert_eq!(ids(&results), ["b1", "b2"]);
}

#[test]
fn test_and_equals_intersection() {
    let ctx = TestContext::new();
    let startups = ctx.marketplace.catalog().startups();
    let term = SearchCriteria::new().with_term("a");
    let range = SearchCriteria::new().with_range(InvestmentRange::from_label("$500K - $1M").unwrap());
    let combined = SearchCriteria::new()
        .with_term("a")
        .with_range(InvestmentRange::from_label("$500K - $1M").unwrap());

    let by_term = ids(&filter_startups(startups, &term));
    let by_range = ids(&filter_startups(startups, &range));
    let intersection: Vec<String> = by_term
        .iter()
        .filter(|id| by_range.contains(id))
        .cloned()
        .collect();
    assert_eq!(ids(&filter_startups(startups, &combined)), intersection);
}

#[test]
fn test_every_category_partitions_catalog() {
    let ctx = TestContext::new();
    let catalog = ctx.marketplace.catalog();
    let total: usize = dealsdive::constants::CATEGORIES
        .iter()
        .map(|c| {
            let criteria = SearchCriteria::new().with_category(CategoryFilter::parse(c));
            filter_startups(catalog.startups(), &criteria).len()
        })
        .sum();
    assert_eq!(total, catalog.startups().len());
}

#[test]
fn test_recent_sort_follows_new_activity() {
    let ctx = TestContext::new();
    let flow = ctx.flow();

    // talking to Michael moves HealthTrack AI to the top
    let conversation = flow.open_conversation(&Id::from("c2")).unwrap();
    conversation.send_text("Is the demo still on?").unwrap();

    let results = search_catalog(
        ctx.marketplace.catalog(),
        &SearchCriteria::default(),
        Some(SortOrder::Recent),
    );
    assert_eq!(results[0].id, "b2");
    assert_eq!(results[1].id, "b1");
}

#[test]
fn test_custom_fixture() {
    let clock = FixedClock::default();
    let json = r#"{
        "startups": [
            {"id": "s1", "name": "Zeta", "description": "z", "category": "Finance",
             "requested_amount": 10, "equity_percent": 1, "location": "X", "founder": "Y"},
            {"id": "s2", "name": "alpha", "description": "a", "category": "Finance",
             "requested_amount": 20, "equity_percent": 2, "location": "X", "founder": "Y"}
        ]
    }"#;
    let marketplace = Marketplace::from_json(json, &clock).unwrap();
    let results = search_catalog(
        marketplace.catalog(),
        &SearchCriteria::default(),
        Some(SortOrder::Alphabetical),
    );
    assert_eq!(ids(&results), ["s2", "s1"]);
    assert!(marketplace.catalog().contacts().is_empty());
}
