use uri_template_bind::{Component, Expression, TemplateError, UriTemplate, Varspec};

fn template(s: &str) -> UriTemplate {
    UriTemplate::parse(s).unwrap()
}

#[test]
fn literal_only_round_trip() {
    for s in [
        "",
        "/",
        "/a/b/c",
        "/a?b=c&d",
        "http://example.com/x?y=z",
        "http://Example.com",
    ] {
        let t = template(s);
        assert_eq!(t.expand().as_str(), s);
        assert_eq!(t.to_string(), s);
    }
}

#[test]
fn reparse_is_idempotent() {
    for s in [
        "/foo{bar}",
        "/item/{id}/view{?fields,sort*}",
        "/s?fixed=1{&a}{&b,c*}",
        "/users/{user}/repos/{repo}",
        "/q?who={who}{&x}",
    ] {
        let t = template(s);
        let text = t.to_string();
        assert_eq!(template(&text).to_string(), text);
    }
}

#[test]
fn simple_expansion() {
    let t = template("/foo{bar}");
    assert_eq!(t.bind("bar", "1").expand(), "/foo1");
    assert_eq!(t.bind_list("bar", ["1", "2"]).expand(), "/foo1,2");
}

#[test]
fn query_expansion() {
    let t = template("{?a,b}");
    assert_eq!(t.bind("a", "x").bind("b", "y").expand(), "?a=x&b=y");
    assert_eq!(t.bind("a", "x").expand(), "?a=x");
    assert_eq!(t.expand(), "");
}

#[test]
fn exploded_query_expansion() {
    let t = template("{?a*}");
    assert_eq!(t.bind_list("a", ["1", "2"]).expand(), "?a=1&a=2");
}

#[test]
fn repeated_variable_name() {
    assert_eq!(
        UriTemplate::parse("/{a}/x{?a}"),
        Err(TemplateError::RepeatedVariableName {
            name: "a".to_string()
        })
    );
    assert_eq!(
        UriTemplate::parse("{a}{a}"),
        Err(TemplateError::RepeatedVariableName {
            name: "a".to_string()
        })
    );
}

#[test]
fn first_value_missing() {
    let bound = template("{?a,b,c}").bind("b", "1");
    assert!(matches!(
        bound.create_template(),
        Err(TemplateError::FirstValueMissing { .. })
    ));
}

#[test]
fn missing_operator() {
    let expression = Expression::new(
        None,
        vec![
            Varspec::new("a", false).unwrap(),
            Varspec::new("b", false).unwrap(),
        ],
    );
    let t = UriTemplate::from_components([
        Component::Literal("/x/".to_string()),
        Component::Expression(expression),
    ]);
    assert_eq!(t.to_string(), "/x/{a,b}");
    assert!(matches!(
        t.bind("a", "1").create_template(),
        Err(TemplateError::MissingOperator { .. })
    ));
}

#[test]
fn errors_are_raised_lazily() {
    let bound = template("{?a,b}").bind("b", "1");
    assert_eq!(bound.expand(), "?b=1");
    assert!(bound.create_template().is_err());
    assert!(bound.bind("a", "0").create_template().is_ok());
}

#[test]
fn try_bind_round_trip() {
    let t = template("/item/{id}");
    let bound = t.try_bind("/item/42").unwrap();
    assert_eq!(&bound.values()["id"], ["42"]);
    assert_eq!(bound.values().len(), 1);
    assert_eq!(bound.expand(), "/item/42");
}

#[test]
fn try_bind_from_expanded_uri() {
    let t = template("/item/{id}/view{?q}");
    let uri = t.bind("id", "7").bind("q", "x").expand();
    let bound = t.try_bind(&uri).unwrap();
    assert_eq!(&bound.values()["q"], ["x"]);
    assert_eq!(bound.expand(), uri);
}

#[test]
fn try_bind_absolute_uri_keeps_text() {
    let t = template("http://Example.com/{a}");
    let uri = t.bind("a", "x y").expand();
    assert_eq!(uri, "http://Example.com/x y");
    assert!(uri.is_absolute());
    let bound = t.try_bind(&uri).unwrap();
    assert_eq!(&bound.values()["a"], ["x y"]);
}

#[test]
fn try_bind_mismatch() {
    let t = template("/item/{id}");
    assert!(t.try_bind("/other/42").is_none());
    assert!(t.try_bind("").is_none());
    assert!(template("").try_bind("/x").is_none());
}

#[test]
fn try_bind_result_can_be_rebound() {
    let t = template("/item/{id}/view{?q}");
    let bound = t.try_bind("/item/42/view?q=old").unwrap().bind("q", "new");
    assert_eq!(bound.expand(), "/item/42/view?q=new");
}

#[test]
fn bind_replaces_values() {
    let t = template("/x{?a}");
    let bound = t.bind("a", "1").bind("a", "2");
    assert_eq!(&bound.values()["a"], ["2"]);

    let bound = t.bind_list("a", ["1", "2"]).bind("A", "3");
    assert_eq!(&bound.values()["a"], ["3"]);
}

#[test]
fn bind_undeclared_name() {
    let bound = template("/x{?a}").bind("a", "1").bind("zzz", "2");
    assert_eq!(bound.values().len(), 1);
    assert!(!bound.values().contains_key("zzz"));
}

#[test]
fn bind_shares_template() {
    let t = template("/x/{a}");
    let first = t.bind("a", "1");
    let second = t.bind("a", "2");
    assert_eq!(first.template(), second.template());
    assert_eq!(first.expand(), "/x/1");
    assert_eq!(second.expand(), "/x/2");
}

#[test]
fn expand_with_override() {
    let bound = template("/x/{a}").bind("a", "1");
    let mut other = uri_template_bind::Values::new();
    other.insert("a", ["9"]);
    assert_eq!(bound.expand_with(&other), "/x/9");
    assert_eq!(bound.expand(), "/x/1");
}

#[test]
fn partial_expansion_chain() {
    let t = template("/users/{user}/repos{?sort,page,per_page}");

    let step = t.bind("user", "octo").create_template().unwrap();
    assert_eq!(step.to_string(), "/users/octo/repos{?sort,page,per_page}");

    let step = step
        .bind("sort", "name")
        .bind("per_page", "10")
        .create_template()
        .unwrap();
    assert_eq!(step.to_string(), "/users/octo/repos?sort=name{&page}&per_page=10");

    assert_eq!(
        step.bind("page", "2").expand(),
        "/users/octo/repos?sort=name&page=2&per_page=10"
    );
    assert_eq!(step.expand(), "/users/octo/repos?sort=name&per_page=10");
}
