//! Tier 1: Queries
//!
//! Escaped documents go out, wire values and typed results come back.

use crate::test_utils::*;
use faunadb::{FaunaObject, Ref};
use serde_json::json;

#[derive(Debug, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb")]
struct Spell {
    name: String,
    cost: i64,
}

/// Literal objects in a query are escaped
#[test]
fn test_query_body_is_escaped() {
    let scripted = Scripted::new().reply(200, r#"{"resource": {"ref": {"@ref": {"id": "1"}}}}"#);
    let client = client(scripted);

    let data: Value = [("name", Value::from("Fire Beak")), ("cost", Value::Long(15))]
        .into_iter()
        .collect();
    let expr = Expr::call_with([
        ("create", Expr::from(Ref::class("spells"))),
        ("params", Expr::object([("data", Expr::from(data))])),
    ]);
    client.query(expr).unwrap();

    assert_eq!(
        client.transport().body(0),
        json!({
            "create": {"@ref": {"id": "spells", "class": {"@ref": {"id": "classes"}}}},
            "params": {"object": {"data": {"object": {"name": "Fire Beak", "cost": 15}}}}
        })
    );
}

/// Containers held directly in a value node are escaped in the body
#[test]
fn test_value_node_body_is_escaped() {
    let client = client(Scripted::new().reply(200, r#"{"resource": null}"#));
    let literal: Value = [("create", Value::from("not an op"))].into_iter().collect();
    client.query(Expr::Value(Value::Array(vec![literal]))).unwrap();
    assert_eq!(
        client.transport().body(0),
        json!([{"object": {"create": "not an op"}}])
    );
}

/// Tagged values in the response decode to their variants
#[test]
fn test_response_tags_decode() {
    let scripted = Scripted::new().reply(
        200,
        r#"{"resource": {"ts": {"@ts": "2017-01-01T00:00:00.000001Z"}, "ref": {"@ref": {"id": "1"}}}}"#,
    );
    let value = client(scripted).query(Expr::null()).unwrap();
    let fields = value.as_object().unwrap();
    assert_eq!(fields["ts"].type_name(), "Timestamp");
    assert_eq!(fields["ref"], Value::Ref(Ref::new("1")));
}

/// Results decode straight into user types
#[test]
fn test_query_as_user_type() {
    let scripted =
        Scripted::new().reply(200, r#"{"resource": [{"name": "Fire Beak", "cost": 15}, {"name": "Dart", "cost": 2}]}"#);
    let spells: Vec<Spell> = client(scripted).query_as(Expr::null()).unwrap();
    assert_eq!(spells.len(), 2);
    assert_eq!(spells[1], Spell { name: "Dart".into(), cost: 2 });
}

/// Decode failures surface as client errors carrying the codec failure
#[test]
fn test_query_as_decode_failure() {
    let scripted = Scripted::new().reply(200, r#"{"resource": {"name": "Fire Beak"}}"#);
    let err = client(scripted).query_as::<Spell>(Expr::null()).unwrap_err();
    match err {
        ClientError::Decode(inner) => assert!(inner.to_string().contains("cost"), "{}", inner),
        other => panic!("Expected Decode, got {:?}", other),
    }
}

/// Batches send one array and return results in order
#[test]
fn test_query_batch() {
    let scripted = Scripted::new().reply(200, r#"{"resource": ["a", "b"]}"#);
    let client = client(scripted);
    let results = client
        .query_batch(vec![Expr::from("a"), Expr::from("b")])
        .unwrap();
    assert_eq!(results, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(client.transport().body(0), json!(["a", "b"]));
}

/// Transport failures pass through untouched
#[test]
fn test_transport_failure() {
    let err = client(Scripted::new().fail("connection refused"))
        .query(Expr::null())
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(ref m) if m == "connection refused"));
}

/// Bodies that are not JSON are reported, not panicked on
#[test]
fn test_garbage_body() {
    let err = client(Scripted::new().reply(200, "<html>"))
        .query(Expr::null())
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedResponse(_)), "{:?}", err);
}

/// Long non-ASCII bodies are truncated safely in the error message
#[test]
fn test_long_multibyte_body() {
    let body = format!("{}é more", "a".repeat(199));
    let err = client(Scripted::new().reply(200, &body))
        .query(Expr::null())
        .unwrap_err();
    match err {
        ClientError::UnexpectedResponse(message) => assert!(message.ends_with('é'), "{}", message),
        other => panic!("Expected UnexpectedResponse, got {:?}", other),
    }

    let err = client(Scripted::new().reply(502, &body))
        .query(Expr::null())
        .unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 502, .. }), "{:?}", err);
}

/// Bad wire tags in the resource are wire errors
#[test]
fn test_bad_tag_in_resource() {
    let err = client(Scripted::new().reply(200, r#"{"resource": {"@date": "soon"}}"#))
        .query(Expr::null())
        .unwrap_err();
    assert!(matches!(err, ClientError::Wire(_)), "{:?}", err);
}
