#![cfg(feature = "serde")]

use serde::Deserialize;
use serde_json::json;

use uri_template_bind::UriTemplate;

#[derive(Deserialize)]
struct Endpoint {
    name: String,
    template: UriTemplate,
}

#[test]
fn deserialize_template() {
    let endpoint: Endpoint = serde_json::from_value(json!({
        "name": "item",
        "template": "/item/{id}/view{?fields}",
    }))
    .unwrap();
    assert_eq!(endpoint.name, "item");
    assert_eq!(
        endpoint.template.bind("id", "1").expand().as_str(),
        "/item/1/view"
    );
}

#[test]
fn deserialize_invalid_template() {
    let result: Result<Endpoint, _> = serde_json::from_value(json!({
        "name": "broken",
        "template": "/item/{id}{?fields}",
    }));
    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("adjacent varspecs"), "{}", message);
}

#[test]
fn serialize_bound_template() {
    let bound = UriTemplate::parse("/item/{id}/view{?tag*}")
        .unwrap()
        .bind("id", "7")
        .bind_list("tag", ["a", "b"]);
    assert_eq!(
        serde_json::to_value(&bound).unwrap(),
        json!({
            "template": "/item/{id}/view{?tag*}",
            "values": { "id": ["7"], "tag": ["a", "b"] },
        })
    );
}
