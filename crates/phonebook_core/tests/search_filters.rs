use phonebook_core::{
    filtered_search, search_by_keyword, Entry, EntryField, FilterSet, InMemoryEntryRepository,
    Store,
};

fn entries() -> Vec<Entry> {
    vec![
        Entry::new("Smith", "Anna", "Petrovna", "Acme", "555-123-4567", ""),
        Entry::new("Jones", "Bob", "", "Acme", "", ""),
        Entry::new("Brown", "Anna", "", "Initech", "", "555-765-4321"),
    ]
}

#[test]
fn unconstrained_filters_return_everything_in_order() {
    let entries = entries();
    let hits = filtered_search(&entries, &FilterSet::new());
    assert_eq!(hits, entries.iter().collect::<Vec<_>>());
}

#[test]
fn surname_filter_is_case_insensitive() {
    let entries = vec![
        Entry::new("Smith", "", "", "", "", ""),
        Entry::new("Jones", "", "", "", "", ""),
    ];
    let filters = FilterSet::new().with(EntryField::Surname, ["smith"]);
    assert_eq!(filtered_search(&entries, &filters), vec![&entries[0]]);
}

#[test]
fn filter_requires_every_constrained_field() {
    let entries = entries();
    let mut filters = FilterSet::new();
    filters.insert_keywords(EntryField::Name, "anna");
    filters.insert_keywords(EntryField::Organization, "ACME initech");
    filters.insert_keywords(EntryField::FatherName, "petrovna");

    assert_eq!(filtered_search(&entries, &filters), vec![&entries[0]]);
}

#[test]
fn filter_value_is_not_a_substring_match() {
    let entries = entries();
    let filters = FilterSet::new().with(EntryField::Organization, ["acm"]);
    assert!(filtered_search(&entries, &filters).is_empty());
}

#[test]
fn keyword_search_checks_every_field() {
    let entries = entries();
    assert_eq!(
        search_by_keyword(&entries, "555-765-4321"),
        vec![&entries[2]]
    );
    assert_eq!(search_by_keyword(&entries, "anna"), vec![&entries[0], &entries[2]]);
    assert!(search_by_keyword(&entries, "").is_empty());
}

#[test]
fn store_queries_delegate_to_search_engine() {
    let store = Store::with_entries(InMemoryEntryRepository::default(), entries());
    let filters = FilterSet::new().with(EntryField::Organization, ["acme"]);

    assert_eq!(store.filtered_search(&filters).len(), 2);
    assert_eq!(store.search_by_keyword("BOB").len(), 1);

    let pages = store.pages(2).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].entries, &store.entries()[2..]);
}
