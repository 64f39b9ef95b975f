use signpost_router::{
    components::{
        create_router, Outlet, OutletChange, Redirect, Resolution, Route,
        Switch,
    },
    location::{MemoryHistory, Url},
    params::ParamsMap,
    NavigateOptions, NavigationTarget, RouterError, RouterOptions,
};

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn page(params: ParamsMap) -> String {
    match params.get_str("id") {
        Some(id) => format!("page {id}"),
        None => "page".to_string(),
    }
}

fn other(_: ParamsMap) -> String {
    "other".to_string()
}

fn route(path: &str, view: &str) -> Route<String> {
    Route::builder()
        .path(path)
        .children(view.to_string())
        .build()
        .unwrap()
}

#[test]
fn first_match_wins_over_more_specific_routes() {
    let switch = Switch::new([route("/*", "all"), route("/user/:id", "user")]);
    let matched = switch
        .resolve(&url("/user/7"), &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(matched.id(), switch.routes()[0].id());
    assert_eq!(matched.view(), "all");
    assert!(matched.params.is_empty());
}

#[test]
fn falls_through_to_later_routes() {
    let switch = Switch::new([
        route("/", "home"),
        route("/user/:id", "user"),
        Route::builder().children("fallback".to_string()).build().unwrap(),
    ]);

    let matched = switch
        .resolve(&url("/user/7"), &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(matched.view(), "user");
    assert_eq!(matched.params.get_str("id"), Some("7"));

    let matched = switch
        .resolve(&url("/nowhere"), &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(matched.view(), "fallback");
}

#[test]
fn later_routes_are_not_evaluated() {
    use std::{cell::Cell, rc::Rc};

    let calls = Rc::new(Cell::new(0));
    let counted = {
        let calls = Rc::clone(&calls);
        Route::builder()
            .path("/a")
            .render(move |_| {
                calls.set(calls.get() + 1);
                "counted".to_string()
            })
            .build()
            .unwrap()
    };
    let switch = Switch::new([route("/a", "first"), counted]);
    let matched = switch
        .resolve(&url("/a"), &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(matched.view(), "first");
    assert_eq!(calls.get(), 0);
}

#[test]
fn nothing_matched_without_redirect() {
    let switch = Switch::new([route("/", "home")]);
    assert!(matches!(
        switch.resolve(&url("/missing"), &ParamsMap::new()),
        Resolution::Empty
    ));
}

#[test]
fn resolving_is_pure() {
    let history = MemoryHistory::new("/missing");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch = Switch::new([route("/", "home")]).redirect("/");

    let resolution = switch.resolve(&router.get_url(), &ParamsMap::new());
    assert!(matches!(
        resolution,
        Resolution::Redirect(NavigationTarget::Literal(ref to)) if to == "/"
    ));
    assert_eq!(history.history_writes(), 0);
    assert_eq!(router.get_url().path(), "/missing");
}

#[test]
fn redirects_when_nothing_matches() {
    let history = MemoryHistory::new("/missing");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch = Switch::new([route("/", "home")]).redirect("/");

    let matched = switch.run(&router).unwrap().unwrap();
    assert_eq!(matched.view(), "home");
    assert_eq!(router.get_url().path(), "/");
    assert_eq!(history.entries(), vec!["/missing", "/"]);

    // matching again does not navigate
    let matched = switch.run(&router).unwrap().unwrap();
    assert_eq!(matched.view(), "home");
    assert_eq!(history.history_writes(), 1);
}

#[test]
fn redirect_target_can_depend_on_url() {
    let history = MemoryHistory::new("/secret");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch = Switch::new([route("/login", "login")]).redirect(
        Redirect::callback(|url: &Url| {
            NavigationTarget::from(format!("/login?next={}", url.path()))
        }),
    );

    let matched = switch.run(&router).unwrap().unwrap();
    assert_eq!(matched.view(), "login");
    let url = router.get_url();
    assert_eq!(url.query().get_str("next"), Some("/secret"));
    assert_eq!(url.to_full_path(), "/login?next=%2Fsecret");
}

#[test]
fn structured_redirect_target() {
    let history = MemoryHistory::new("/old");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch =
        Switch::new([route("/new", "new")]).redirect(url("/new?from=old"));
    switch.run(&router).unwrap();
    assert_eq!(router.get_url().to_full_path(), "/new?from=old");
}

#[test]
fn redirect_to_unmatched_location_yields_nothing() {
    let history = MemoryHistory::new("/a");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch = Switch::new([route("/", "home")]).redirect("/b");
    assert!(switch.run(&router).unwrap().is_none());
    assert_eq!(router.get_url().path(), "/b");
}

#[test]
fn shared_component_is_not_remounted() {
    let switch = Switch::new([
        Route::builder().path("/").component(page).build().unwrap(),
        Route::builder().path("/about").component(page).build().unwrap(),
        Route::builder().path("/other").component(other).build().unwrap(),
    ]);
    let mut outlet = Outlet::new();
    let mut show = |path: &str| {
        let url = url(path);
        let matched = switch.resolve(&url, &ParamsMap::new()).into_match();
        outlet.update(matched.as_ref())
    };

    assert_eq!(show("/"), OutletChange::Mounted);
    assert_eq!(show("/"), OutletChange::Unchanged);
    assert_eq!(show("/about"), OutletChange::Rerendered);
    assert_eq!(show("/other"), OutletChange::Mounted);
    assert_eq!(show("/nowhere"), OutletChange::Cleared);
    assert_eq!(show("/nowhere"), OutletChange::Unchanged);
}

#[test]
fn same_route_with_new_params_is_updated_in_place() {
    let switch = Switch::new([Route::builder()
        .path("/users/:id")
        .component(page)
        .build()
        .unwrap()]);
    let mut outlet = Outlet::new();

    let first = switch.resolve(&url("/users/1"), &ParamsMap::new());
    assert_eq!(
        outlet.update(first.into_match().as_ref()),
        OutletChange::Mounted
    );
    let id = outlet.current();

    let second = switch.resolve(&url("/users/2"), &ParamsMap::new());
    let second = second.into_match();
    assert_eq!(outlet.update(second.as_ref()), OutletChange::ParamsChanged);
    assert_eq!(outlet.current(), id);
    assert_eq!(outlet.params().unwrap().get_str("id"), Some("2"));
    assert_eq!(second.unwrap().view(), "page 2");
}

#[test]
fn distinct_children_are_remounted() {
    let switch = Switch::new([route("/a", "same"), route("/b", "same")]);
    let mut outlet = Outlet::new();
    let a = switch.resolve(&url("/a"), &ParamsMap::new()).into_match();
    let b = switch.resolve(&url("/b"), &ParamsMap::new()).into_match();
    assert_eq!(outlet.update(a.as_ref()), OutletChange::Mounted);
    assert_eq!(outlet.update(b.as_ref()), OutletChange::Mounted);
}

#[test]
fn nested_switches_inherit_params() {
    let outer = Switch::new([route("/:lang/*", "layout")]);
    let inner = Switch::new([
        route("/:lang/docs/:page", "doc"),
        route("/en/blog/:id", "post"),
    ]);

    let location = url("/en/blog/12");
    let layout = outer
        .resolve(&location, &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(layout.params.get_str("lang"), Some("en"));

    let post = inner
        .resolve(&location, &layout.params)
        .into_match()
        .unwrap();
    assert_eq!(post.view(), "post");
    assert_eq!(post.params.get_str("lang"), Some("en"));
    assert_eq!(post.params.get_str("id"), Some("12"));
}

#[test]
fn nested_params_override_inherited_ones() {
    let outer = Switch::new([route("/:id/*", "layout")]);
    let inner = Switch::new([route("/:section/:id", "item")]);
    let location = url("/shop/42");

    let layout = outer
        .resolve(&location, &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(layout.params.get_str("id"), Some("shop"));

    let item = inner
        .resolve(&location, &layout.params)
        .into_match()
        .unwrap();
    assert_eq!(item.params.get_str("id"), Some("42"));
    assert_eq!(item.params.get_str("section"), Some("shop"));
}

#[test]
fn sibling_branches_do_not_share_params() {
    let switch = Switch::new([route("/a/:x", "a"), route("/b/:y", "b")]);
    let a = switch
        .resolve(&url("/a/1"), &ParamsMap::new())
        .into_match()
        .unwrap();
    let b = switch
        .resolve(&url("/b/2"), &ParamsMap::new())
        .into_match()
        .unwrap();
    assert_eq!(a.params.get_str("y"), None);
    assert_eq!(b.params.get_str("x"), None);
}

#[test]
fn route_needs_something_to_show() {
    let result = Route::<String>::builder().path("/empty").build();
    assert!(matches!(
        result,
        Err(RouterError::NoMatch(path)) if path == "/empty"
    ));
}

#[test]
fn switch_follows_router_navigation() {
    let history = MemoryHistory::new("/");
    let router =
        create_router(RouterOptions::default(), history.clone()).unwrap();
    let switch = Switch::new([
        Route::builder().path("/").component(page).build().unwrap(),
        Route::builder()
            .path("/users/:id")
            .component(page)
            .build()
            .unwrap(),
    ]);

    assert_eq!(switch.run(&router).unwrap().unwrap().view(), "page");
    router
        .navigate("/users/5", NavigateOptions::default())
        .unwrap();
    assert_eq!(switch.run(&router).unwrap().unwrap().view(), "page 5");
}
