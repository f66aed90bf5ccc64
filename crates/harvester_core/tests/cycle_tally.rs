use harvester_core::{
    canonicalize_href, BaseOrigin, CanonicalUrl, CycleTally, ExtractionFailure, ItemIdentity,
    ItemOutcome, ResultSet,
};
use pretty_assertions::assert_eq;

fn url(path: &str) -> CanonicalUrl {
    let origin = BaseOrigin::parse("https://x.com").unwrap();
    canonicalize_href(path, &origin).unwrap()
}

fn id(value: &str) -> Option<ItemIdentity> {
    Some(ItemIdentity::DataAttribute(value.to_string()))
}

#[test]
fn partial_failures_do_not_hide_new_links() {
    let mut results = ResultSet::new();
    results.insert(url("/a/status/1"));
    results.insert(url("/a/status/2"));
    let before = results.len();

    let mut tally = CycleTally::new();
    let items: Vec<Result<CanonicalUrl, ExtractionFailure>> = vec![
        Ok(url("/a/status/1")),
        Err(ExtractionFailure::NoPermalink),
        Ok(url("/a/status/3")),
        Ok(url("/a/status/4")),
        Err(ExtractionFailure::AttributeTimeout),
        Ok(url("/a/status/2")),
        Ok(url("/a/status/5")),
        Err(ExtractionFailure::EmptyHref),
        Ok(url("/a/status/6")),
        Ok(url("/a/status/7")),
    ];
    for (index, item) in items.into_iter().enumerate() {
        assert!(tally.admit(id(&index.to_string())));
        tally.record(item, &mut results);
    }

    let report = tally.finish();
    assert_eq!(report.new_count, 5);
    assert_eq!(report.successes, 7);
    assert_eq!(report.failures, 3);
    assert_eq!(report.trailing_failures, 0);
    assert!(report.saw_success);
    assert_eq!(results.len(), before + 5);
}

#[test]
fn repeated_urls_across_cycles_are_stored_once() {
    let mut results = ResultSet::new();
    let mut sizes = Vec::new();

    for _cycle in 0..4 {
        let mut tally = CycleTally::new();
        for path in ["/a/status/1", "/b/status/2", "/a/status/1"] {
            tally.admit(None);
            tally.record(Ok(url(path)), &mut results);
        }
        sizes.push(results.len());
    }

    assert_eq!(sizes, vec![2, 2, 2, 2]);
    assert_eq!(
        results.finalize(),
        vec![url("/a/status/1"), url("/b/status/2")]
    );
}

#[test]
fn result_set_never_shrinks() {
    let mut results = ResultSet::new();
    let mut previous = 0;
    let paths = ["/c/status/3", "/a/status/1", "/c/status/3", "/b/status/2", "/a/status/1"];
    for path in paths {
        let mut tally = CycleTally::new();
        tally.admit(None);
        tally.record(Ok(url(path)), &mut results);
        assert!(results.len() >= previous);
        previous = results.len();
    }
    assert_eq!(previous, 3);
}

#[test]
fn identity_guard_skips_repeats_within_a_cycle_only() {
    let mut tally = CycleTally::new();
    assert!(tally.admit(id("42")));
    assert!(!tally.admit(id("42")));
    assert!(tally.admit(Some(ItemIdentity::DomId("42".into()))));
    assert!(tally.admit(None));
    assert!(tally.admit(None));
    assert_eq!(tally.report().skipped, 1);

    let mut next_cycle = CycleTally::new();
    assert!(next_cycle.admit(id("42")));
}

#[test]
fn outcomes_distinguish_new_duplicate_and_failed() {
    let mut results = ResultSet::new();
    let mut tally = CycleTally::new();

    assert_eq!(
        tally.record(Ok(url("/a/status/1")), &mut results),
        ItemOutcome::New(url("/a/status/1"))
    );
    assert_eq!(
        tally.record(Ok(url("/a/status/1")), &mut results),
        ItemOutcome::Duplicate(url("/a/status/1"))
    );
    assert_eq!(
        tally.record(Err(ExtractionFailure::NoPermalink), &mut results),
        ItemOutcome::Failed(ExtractionFailure::NoPermalink)
    );
}

#[test]
fn trailing_failures_count_only_after_last_success() {
    let mut results = ResultSet::new();
    let mut tally = CycleTally::new();
    tally.record(Err(ExtractionFailure::NoPermalink), &mut results);
    tally.record(Ok(url("/a/status/1")), &mut results);
    tally.record(Err(ExtractionFailure::NoPermalink), &mut results);
    tally.record(Err(ExtractionFailure::EmptyHref), &mut results);

    let report = tally.finish();
    assert_eq!(report.failures, 3);
    assert_eq!(report.trailing_failures, 2);
}

#[test]
fn finalize_sorts_discovery_order() {
    let mut results = ResultSet::new();
    results.insert(url("/z/status/9"));
    results.insert(url("/a/status/1"));
    let discovery: Vec<_> = results.iter().cloned().collect();
    assert_eq!(discovery, vec![url("/z/status/9"), url("/a/status/1")]);
    assert_eq!(
        results.finalize(),
        vec![url("/a/status/1"), url("/z/status/9")]
    );
}
