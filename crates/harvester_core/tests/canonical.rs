use harvester_core::{canonicalize_href, BaseOrigin, ExtractionFailure, OriginError};
use pretty_assertions::assert_eq;

fn x_origin() -> BaseOrigin {
    BaseOrigin::parse("https://x.com").unwrap()
}

#[test]
fn absolute_href_drops_query() {
    let url = canonicalize_href("https://x.com/u/status/5?foo=1", &x_origin()).unwrap();
    assert_eq!(url.as_str(), "https://x.com/u/status/5");
}

#[test]
fn root_relative_href_is_prefixed_with_origin() {
    let url = canonicalize_href("/u/status/5?foo=1", &x_origin()).unwrap();
    assert_eq!(url.as_str(), "https://x.com/u/status/5");
}

#[test]
fn both_forms_of_the_same_item_normalise_identically() {
    let origin = x_origin();
    let absolute = canonicalize_href("https://x.com/u/status/5?s=20", &origin).unwrap();
    let relative = canonicalize_href("/u/status/5", &origin).unwrap();
    let fragment = canonicalize_href("/u/status/5#reply", &origin).unwrap();
    assert_eq!(absolute, relative);
    assert_eq!(relative, fragment);
}

#[test]
fn absolute_href_on_other_host_is_kept_as_is() {
    let url = canonicalize_href("http://mirror.example/u/status/9", &x_origin()).unwrap();
    assert_eq!(url.as_str(), "http://mirror.example/u/status/9");
}

#[test]
fn empty_href_is_a_failure() {
    assert_eq!(
        canonicalize_href("   ", &x_origin()),
        Err(ExtractionFailure::EmptyHref)
    );
}

#[test]
fn other_href_forms_are_rejected() {
    let origin = x_origin();
    for href in ["u/status/5", "//cdn.x.com/u/status/5", "javascript:void(0)", "mailto:a@b.c"] {
        assert_eq!(
            canonicalize_href(href, &origin),
            Err(ExtractionFailure::UnsupportedHref(href.to_string())),
            "href {href}"
        );
    }
}

#[test]
fn base_origin_ignores_path_and_trailing_slash() {
    let origin = BaseOrigin::parse("https://x.com/home/").unwrap();
    assert_eq!(origin.as_str(), "https://x.com");

    let url = canonicalize_href("/u/status/1", &origin).unwrap();
    assert_eq!(url.as_str(), "https://x.com/u/status/1");
}

#[test]
fn base_origin_keeps_non_default_port() {
    let origin = BaseOrigin::parse("http://localhost:8080").unwrap();
    assert_eq!(origin.as_str(), "http://localhost:8080");
}

#[test]
fn base_origin_rejects_garbage() {
    assert!(matches!(
        BaseOrigin::parse("not a url"),
        Err(OriginError::Parse(_))
    ));
    assert!(matches!(
        BaseOrigin::parse("data:text/plain,hi"),
        Err(OriginError::Opaque(_))
    ));
}
