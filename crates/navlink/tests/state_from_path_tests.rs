//! Integration tests for path → state resolution
//!
//! Covers:
//! - Param extraction, parsing and decoding
//! - Initial route synthesis
//! - Pattern priority and duplicate detection
//! - `exact`, prefixes, the empty path and query strings
//! - Segment fallback without screens

use navlink::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn linking(options: LinkingOptions) -> Linking {
    init_tracing();
    Linking::new(options).unwrap()
}

fn to_json(state: &NavigationState) -> Value {
    serde_json::to_value(state).unwrap()
}

fn focused_params(state: &NavigationState) -> Value {
    state
        .find_focused_route()
        .and_then(|route| route.params.clone())
        .map(Value::Object)
        .unwrap_or(Value::Null)
}

#[test]
fn test_chat_params_are_parsed() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Chat",
        ScreenOptions::new()
            .with_path("chat/:author/:id")
            .with_parse("id", ParamParser::Number),
    )));

    let state = linking.state_from_path("/chat/jane/42").unwrap();
    assert_eq!(
        to_json(&state),
        json!({
            "routes": [{
                "name": "Chat",
                "params": {"author": "jane", "id": 42},
                "path": "/chat/jane/42"
            }]
        })
    );
}

#[test]
fn test_initial_route_is_synthesized_for_nested_navigator() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Foo",
        ScreenOptions::new()
            .with_initial_route_name("Baz")
            .with_screen("Bar", "bar/:id")
            .with_screen("Baz", "baz"),
    )));

    let state = linking.state_from_path("/bar/42").unwrap();
    assert_eq!(
        to_json(&state),
        json!({
            "routes": [{
                "name": "Foo",
                "state": {
                    "index": 1,
                    "routes": [
                        {"name": "Baz"},
                        {"name": "Bar", "params": {"id": "42"}, "path": "/bar/42"}
                    ]
                }
            }]
        })
    );

    let state = linking.state_from_path("/baz").unwrap();
    assert_eq!(
        to_json(&state),
        json!({
            "routes": [{
                "name": "Foo",
                "state": {"routes": [{"name": "Baz", "path": "/baz"}]}
            }]
        })
    );
}

#[test]
fn test_top_level_initial_route() {
    let linking = linking(
        LinkingOptions::new(
            ScreenMap::new()
                .with_screen("Home", "home")
                .with_screen("Profile", "profile/:user"),
        )
        .with_initial_route_name("Home"),
    );

    let state = linking.state_from_path("/profile/jane").unwrap();
    assert_eq!(state.index, Some(1));
    assert_eq!(state.routes[0], Route::new("Home"));
    assert_eq!(state.routes[1].name, "Profile");
}

#[test]
fn test_duplicate_patterns_are_rejected() {
    init_tracing();
    let err = Linking::new(LinkingOptions::new(
        ScreenMap::new()
            .with_screen("Foo", "same")
            .with_screen("Bar", "same"),
    ))
    .unwrap_err();

    match err {
        LinkingError::DuplicatePattern {
            pattern,
            first,
            second,
        } => {
            assert_eq!(pattern, "same");
            assert_eq!(first, "Foo");
            assert_eq!(second, "Bar");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_same_pattern_for_ancestor_chain_is_allowed() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Foo",
        ScreenOptions::new().with_path("foo").with_screen("Bar", ""),
    )));

    let state = linking.state_from_path("/foo").unwrap();
    let names: Vec<&str> = std::iter::successors(state.routes.first(), |route| {
        route.state.as_deref().and_then(|nested| nested.routes.first())
    })
    .map(|route| route.name.as_str())
    .collect();
    assert_eq!(names, vec!["Foo", "Bar"]);
}

#[test]
fn test_exact_ignores_parent_path() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Foo",
        ScreenOptions::new()
            .with_path("foo")
            .with_screen("Bar", ScreenOptions::new().with_path("bar").with_exact(true)),
    )));

    let state = linking.state_from_path("/bar").unwrap();
    assert_eq!(state.routes[0].name, "Foo");
    assert_eq!(state.find_focused_route().unwrap().name, "Bar");

    assert!(linking.state_from_path("/foo/bar").is_none());
}

#[test]
fn test_exact_without_path_is_rejected() {
    init_tracing();
    let err = Linking::new(LinkingOptions::new(
        ScreenMap::new().with_screen("Foo", ScreenOptions::new().with_exact(true)),
    ))
    .unwrap_err();
    assert!(matches!(err, LinkingError::ExactWithoutPath { screen } if screen == "Foo"));
}

#[test]
fn test_invalid_inline_regex_is_rejected() {
    init_tracing();
    let err = Linking::new(LinkingOptions::new(
        ScreenMap::new().with_screen("Post", "post/:id([0-9)"),
    ))
    .unwrap_err();
    assert!(matches!(err, LinkingError::InvalidPattern { .. }));
}

fn param_linking() -> Linking {
    linking(LinkingOptions::new(
        ScreenMap::new()
            .with_screen("NotFound", "*")
            .with_screen("Post", "post/:id(\\d+)")
            .with_screen("NewPost", "post/new")
            .with_screen("Search", "search/:query?"),
    ))
}

#[rstest]
#[case("/post/12", "Post", json!({"id": "12"}))]
#[case("/post/new", "NewPost", Value::Null)]
#[case("/post/abc", "NotFound", Value::Null)]
#[case("/post/\u{0663}", "NotFound", Value::Null)]
#[case("/search", "Search", Value::Null)]
#[case("/search/rust%20lang", "Search", json!({"query": "rust lang"}))]
#[case("/search/a/b", "NotFound", Value::Null)]
#[case("/totally/unknown/", "NotFound", Value::Null)]
fn test_param_kinds(#[case] path: &str, #[case] screen: &str, #[case] params: Value) {
    let state = param_linking().state_from_path(path).unwrap();
    let focused = state.find_focused_route().unwrap();

    assert_eq!(focused.name, screen);
    assert_eq!(focused_params(&state), params);
}

#[rstest]
#[case("/chat//jane///42/", "/chat//jane///42")]
#[case("chat/jane/42", "chat/jane/42")]
#[case("/chat/jane/42?x=1", "/chat/jane/42?x=1")]
fn test_focused_path_keeps_input(#[case] input: &str, #[case] expected: &str) {
    let linking = linking(LinkingOptions::new(
        ScreenMap::new().with_screen("Chat", "chat/:author/:id"),
    ));

    let state = linking.state_from_path(input).unwrap();
    assert_eq!(state.find_focused_route().unwrap().path.as_deref(), Some(expected));
}

#[test]
fn test_query_params_merge_into_focused_route() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Chat",
        ScreenOptions::new()
            .with_path("chat/:author")
            .with_parse("id", ParamParser::Number)
            .with_parse("pinned", ParamParser::Boolean),
    )));

    let state = linking
        .state_from_path("/chat/jane?id=7&pinned=true&tag=a&tag=b&author=john&note=hi+there")
        .unwrap();
    assert_eq!(
        focused_params(&state),
        json!({
            "author": "john",
            "id": 7,
            "pinned": true,
            "tag": ["a", "b"],
            "note": "hi there"
        })
    );
}

#[test]
fn test_custom_parser() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Tag",
        ScreenOptions::new()
            .with_path("tag/:name")
            .with_parse("name", ParamParser::custom(|raw| json!(raw.to_uppercase()))),
    )));

    let state = linking.state_from_path("/tag/rust").unwrap();
    assert_eq!(focused_params(&state), json!({"name": "RUST"}));
}

#[test]
fn test_empty_path_uses_empty_pattern() {
    let linking = linking(LinkingOptions::new(ScreenMap::new().with_screen(
        "Root",
        ScreenOptions::new()
            .with_screen("Home", "")
            .with_screen("Chat", "chat"),
    )));

    for path in ["", "/", "//", "/?ref=home"] {
        let state = linking.state_from_path(path).unwrap();
        let focused = state.find_focused_route().unwrap();
        assert_eq!(focused.name, "Home", "path {path:?}");
    }

    let state = linking.state_from_path("/?ref=home").unwrap();
    assert_eq!(focused_params(&state), json!({"ref": "home"}));
}

#[test]
fn test_empty_path_without_empty_pattern() {
    let linking = linking(LinkingOptions::new(
        ScreenMap::new().with_screen("Chat", "chat"),
    ));
    assert!(linking.state_from_path("/").is_none());
}

#[test]
fn test_unmatched_path() {
    let linking = linking(LinkingOptions::new(
        ScreenMap::new().with_screen("Chat", "chat"),
    ));
    assert!(linking.state_from_path("/chat/extra").is_none());
    assert!(linking.state_from_path("/other").is_none());
}

#[rstest]
#[case("/app")]
#[case("app/")]
#[case("//app")]
fn test_prefix_is_stripped(#[case] prefix: &str) {
    let linking = linking(
        LinkingOptions::new(
            ScreenMap::new()
                .with_screen("Home", "")
                .with_screen("Chat", "chat/:id"),
        )
        .with_path(prefix),
    );

    let state = linking.state_from_path("/app/chat/7").unwrap();
    assert_eq!(state.find_focused_route().unwrap().name, "Chat");
    assert_eq!(focused_params(&state), json!({"id": "7"}));

    let state = linking.state_from_path("/app").unwrap();
    assert_eq!(state.find_focused_route().unwrap().name, "Home");

    assert!(linking.state_from_path("/chat/7").is_none());
}

#[test]
fn test_url_prefix() {
    let linking = linking(
        LinkingOptions::new(ScreenMap::new().with_screen("Chat", "chat/:id"))
            .with_path("https://example.com/app"),
    );

    let state = linking
        .state_from_path("https://example.com/app/chat/7")
        .unwrap();
    assert_eq!(focused_params(&state), json!({"id": "7"}));
}

#[test]
fn test_segments_become_routes_without_screens() {
    let linking = linking(LinkingOptions::default().with_initial_route_name("Home"));

    let state = linking.state_from_path("/feed/hot%20takes?page=2").unwrap();
    assert_eq!(
        to_json(&state),
        json!({
            "index": 1,
            "routes": [
                {"name": "Home"},
                {
                    "name": "feed",
                    "state": {
                        "routes": [{
                            "name": "hot takes",
                            "params": {"page": "2"},
                            "path": "/feed/hot%20takes?page=2"
                        }]
                    }
                }
            ]
        })
    );

    assert!(linking.state_from_path("/").is_none());
}

#[test]
fn test_default_handle_maps_segments() {
    init_tracing();
    let state = Linking::default().state_from_path("/a/b").unwrap();
    assert_eq!(state.find_focused_route().unwrap().name, "b");
}

#[test]
fn test_config_from_json() {
    let options = LinkingOptions::from_json_str(
        r#"{
            "initialRouteName": "Home",
            "screens": {
                "Home": "",
                "Chat": {"path": "chat/:author/:id", "parse": {"id": "number"}}
            }
        }"#,
    )
    .unwrap();

    let state = navlink::state_from_path("/chat/jane/42", &options)
        .unwrap()
        .unwrap();
    assert_eq!(state.index, Some(1));
    assert_eq!(focused_params(&state), json!({"author": "jane", "id": 42}));
}

#[test]
fn test_config_from_toml() {
    let options = LinkingOptions::from_toml_str(
        r#"
        [screens.Tabs]
        initialRouteName = "Feed"

        [screens.Tabs.screens]
        Feed = "feed"
        Post = { path = "post/:id", parse = { id = "number" } }
        "#,
    )
    .unwrap();

    let state = navlink::state_from_path("/post/3", &options).unwrap().unwrap();
    let tabs = state.routes[0].state.as_deref().unwrap();
    assert_eq!(tabs.index, Some(1));
    assert_eq!(tabs.routes[0].name, "Feed");
    assert_eq!(focused_params(&state), json!({"id": 3}));
}

#[test]
fn test_cloned_handle_shares_compiled_configs() {
    let linking = linking(LinkingOptions::new(
        ScreenMap::new().with_screen("Chat", "chat"),
    ));
    let clone = linking.clone();

    assert!(std::ptr::eq(linking.configs().as_ptr(), clone.configs().as_ptr()));
    assert_eq!(
        linking.state_from_path("/chat"),
        clone.state_from_path("/chat")
    );
}
