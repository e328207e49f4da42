use chrono::{DateTime, Duration, TimeZone, Utc};
use folioapp::query::sort::compare_labels;
use folioapp::query::{run, run_all, AttrFilter, AttrValue, ListQuery, Listable, SortMode};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    title: String,
    status: &'static str,
    order: i64,
    created: Option<DateTime<Utc>>,
}

impl Listable for Entry {
    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "status" => Some(AttrValue::Enum(self.status.to_string())),
            _ => None,
        }
    }
}

fn entry(title: &str, order: i64) -> Entry {
    Entry {
        title: title.to_string(),
        status: "draft",
        order,
        created: None,
    }
}

const STATUSES: [&str; 3] = ["draft", "published", "scheduled"];
const WORDS: [&str; 8] = [
    "Apple", "banana", "Cherry", "apricot", "Blueberry", "cranberry", "Avocado", "Abc Fruit",
];

/// A varied but deterministic collection.
fn corpus(len: usize) -> Vec<Entry> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..len)
        .map(|i| Entry {
            title: format!("{} {}", WORDS[i % WORDS.len()], i),
            status: STATUSES[(i * 7) % STATUSES.len()],
            order: ((i * 13) % 17) as i64,
            created: (i % 5 != 0).then(|| base + Duration::hours(((i * 31) % 97) as i64)),
        })
        .collect()
}

fn queries() -> Vec<ListQuery> {
    let mut out = Vec::new();
    for sort in [
        SortMode::AzAsc,
        SortMode::AzDesc,
        SortMode::DateAsc,
        SortMode::DateDesc,
        SortMode::OrderAsc,
        SortMode::OrderDesc,
        SortMode::Original,
    ] {
        for size in [1, 3, 10] {
            out.push(ListQuery::new(sort, size));
            out.push(ListQuery::new(sort, size).with_search("a"));
            out.push(ListQuery::new(sort, size).with_filter(AttrFilter::choice("status", "published")));
        }
    }
    out
}

#[test]
fn query_is_idempotent_and_pure() {
    let records = corpus(40);
    let snapshot = records.clone();
    for query in queries() {
        for page in 1..=3 {
            let query = query.clone().with_page(page);
            assert_eq!(run(&records, &query), run(&records, &query));
        }
    }
    assert_eq!(records, snapshot);
}

#[test]
fn stricter_filters_never_grow_the_result() {
    let records = corpus(60);
    for sort in [SortMode::AzAsc, SortMode::DateDesc] {
        let base = ListQuery::new(sort, 10);
        let searched = base.clone().with_search("a");
        let narrower = searched.clone().with_search("ap");
        let filtered = narrower
            .clone()
            .with_filter(AttrFilter::choice("status", "draft"));

        let counts: Vec<usize> = [&base, &searched, &narrower, &filtered]
            .iter()
            .map(|q| run(&records, q).total_filtered)
            .collect();
        assert!(counts.windows(2).all(|w| w[1] <= w[0]), "{:?}", counts);
    }
}

#[test]
fn all_pages_rebuild_the_full_list() {
    let records = corpus(53);
    for query in queries() {
        let expected = run_all(&records, &query);
        let first = run(&records, &query);
        assert_eq!(first.total_filtered, expected.len());

        let mut rebuilt = Vec::new();
        for page in 1..=first.total_pages {
            rebuilt.extend(run(&records, &query.clone().with_page(page)).items);
        }
        assert_eq!(rebuilt, expected);
        assert!(run(&records, &query.clone().with_page(first.total_pages + 1)).is_empty());
    }
}

#[test]
fn az_output_is_ordered() {
    let records = corpus(45);
    let sorted = run_all(&records, &ListQuery::new(SortMode::AzAsc, 10));
    for pair in sorted.windows(2) {
        assert_ne!(compare_labels(&pair[0].title, &pair[1].title), Ordering::Greater);
    }
}

#[test]
fn date_sort_puts_missing_dates_at_epoch() {
    let records = corpus(20);
    let sorted = run_all(&records, &ListQuery::new(SortMode::DateAsc, 10));
    let undated = records.iter().filter(|r| r.created.is_none()).count();
    assert!(sorted[..undated].iter().all(|r| r.created.is_none()));
    assert!(sorted[undated..].iter().all(|r| r.created.is_some()));
}

#[test]
fn search_ignores_case() {
    let records = vec![entry("ABC Corp", 0), entry("xyz", 1), entry("the abc", 2)];
    for sort in [SortMode::AzAsc, SortMode::Original] {
        let upper = run(&records, &ListQuery::new(sort, 10).with_search("ABC"));
        let lower = run(&records, &ListQuery::new(sort, 10).with_search("abc"));
        assert_eq!(upper.items, lower.items);
        assert_eq!(upper.total_filtered, 2);
    }
}

#[test]
fn fruit_sorts_by_label_and_order() {
    let records = vec![entry("Zebra", 2), entry("Apple", 1), entry("Mango", 3)];
    let titles = |mode| -> Vec<String> {
        run(&records, &ListQuery::new(mode, 10))
            .items
            .into_iter()
            .map(|e| e.title)
            .collect()
    };
    assert_eq!(titles(SortMode::AzAsc), ["Apple", "Mango", "Zebra"]);
    assert_eq!(titles(SortMode::OrderAsc), ["Apple", "Zebra", "Mango"]);
}

#[test]
fn twenty_five_records_in_pages_of_ten() {
    let records: Vec<Entry> = (0..25).map(|i| entry(&format!("e{i}"), i)).collect();
    let query = ListQuery::new(SortMode::OrderAsc, 10);

    let third = run(&records, &query.clone().with_page(3));
    assert_eq!(third.total_pages, 3);
    let orders: Vec<i64> = third.items.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![20, 21, 22, 23, 24]);

    let fourth = run(&records, &query.with_page(4));
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total_pages, 3);
}

#[test]
fn published_filter_over_mixed_statuses() {
    let records: Vec<Entry> = ["draft", "published", "published", "scheduled"]
        .into_iter()
        .enumerate()
        .map(|(i, status)| Entry {
            status,
            ..entry(&format!("e{i}"), i as i64)
        })
        .collect();
    let query = ListQuery::default().with_filter(AttrFilter::choice("status", "published"));
    assert_eq!(run(&records, &query).total_filtered, 2);

    let all = ListQuery::default().with_filter(AttrFilter::choice("status", "all"));
    assert_eq!(run(&records, &all).total_filtered, 4);
}

#[test]
fn unknown_sort_key_keeps_input_order() {
    let records = vec![entry("b", 2), entry("a", 1), entry("c", 3)];
    let query = ListQuery::new(SortMode::from_key("popularity"), 10);
    let titles: Vec<String> = run(&records, &query).items.into_iter().map(|e| e.title).collect();
    assert_eq!(titles, ["b", "a", "c"]);
}
