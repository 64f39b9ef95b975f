use signpost_router::location::{Query, QueryValue, ToHref, Url};

fn parse(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn root_path_is_preserved() {
    assert_eq!(parse("/").path(), "/");
    assert_eq!(parse("").path(), "/");
}

#[test]
fn trailing_slash_is_stripped() {
    assert_eq!(parse("/a/").path(), "/a");
    assert_eq!(parse("/a/b/").path(), "/a/b");
}

#[test]
fn repeated_query_keys_become_a_sequence() {
    let url = parse("/?a=b&a=c");
    assert_eq!(
        url.query().get("a"),
        Some(&QueryValue::Many(vec!["b".into(), "c".into()]))
    );
    assert_eq!(url.query().get_all("a").unwrap(), vec!["b", "c"]);
}

#[test]
fn single_query_keys_stay_scalar() {
    let url = parse("/search?q=rust&page=2");
    assert_eq!(url.query().get("q"), Some(&QueryValue::One("rust".into())));
    assert_eq!(url.query().get_str("page"), Some("2"));
}

#[test]
fn empty_hash_is_absent() {
    assert_eq!(parse("/a#").hash(), None);
    assert_eq!(parse("/a").hash(), None);
    assert_eq!(parse("/a#top").hash(), Some("top"));
}

#[test]
fn absolute_urls_keep_only_path_query_and_hash() {
    let url = parse("https://example.com/docs/?v=1#intro");
    assert_eq!(url.to_full_path(), "/docs?v=1#intro");
}

#[test]
fn stringifies_repeated_pairs() {
    let url = Url::default().with_query(
        [("a", QueryValue::from(vec!["b", "c"]))]
            .into_iter()
            .collect::<Query>(),
    );
    assert_eq!(url.to_full_path(), "/?a=b&a=c");
}

#[test]
fn stringify_drops_empty_values() {
    let query = [
        ("keep", QueryValue::from("1")),
        ("empty", QueryValue::from("")),
        ("mixed", QueryValue::from(vec!["", "x", ""])),
        ("none", QueryValue::from(vec!["", ""])),
    ]
    .into_iter()
    .collect::<Query>();
    let url = Url::default().with_path("/list").with_query(query);
    assert_eq!(url.to_full_path(), "/list?keep=1&mixed=x");
}

#[test]
fn stringify_without_query_or_hash() {
    assert_eq!(Url::default().to_full_path(), "/");
    assert_eq!(Url::default().with_path("").to_full_path(), "/");
    assert_eq!(Url::default().with_hash("").to_full_path(), "/");
}

#[test]
fn strings_are_passed_through() {
    assert_eq!("/not//normalized/?x".to_href(), "/not//normalized/?x");
    assert_eq!(String::from("?a=b").to_href(), "?a=b");
}

#[test]
fn round_trips() {
    for s in [
        "/",
        "/a/b?x=1&y=2&y=3#frag",
        "/search?q=a+b&lang=en",
        "/caf%C3%A9?name=J%C3%BCrgen",
        "/a?b=%2F%26#section-2",
    ] {
        let url = parse(s);
        assert_eq!(url.to_full_path(), s);
        assert_eq!(parse(&url.to_full_path()), url);
    }
}

#[test]
fn round_trip_normalizes() {
    // trailing slash and empty values do not survive
    let url = parse("/a/?x=&y=1#");
    assert_eq!(url.to_full_path(), "/a?y=1");
    let again = parse(&url.to_full_path());
    assert_eq!(again.path(), "/a");
    assert_eq!(again.query().get("x"), None);
    assert_eq!(again.hash(), None);
}

#[test]
fn values_are_decoded() {
    let url = parse("/?q=a%20b+c&sym=%26%3D");
    assert_eq!(url.query().get_str("q"), Some("a b c"));
    assert_eq!(url.query().get_str("sym"), Some("&="));
    assert_eq!(url.to_full_path(), "/?q=a+b+c&sym=%26%3D");
}

#[test]
fn display_matches_full_path() {
    let url = parse("/a?b=c#d");
    assert_eq!(url.to_string(), "/a?b=c#d");
    assert_eq!("/a?b=c#d".parse::<Url>().unwrap(), url);
    assert_eq!(Url::try_from("/a?b=c#d").unwrap(), url);
}
