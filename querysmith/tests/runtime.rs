//! Integration tests for the CRUD runtime over the in-memory backend

use querysmith::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// Full create, read, update, delete cycle against one table
#[tokio::test]
async fn test_crud_cycle() {
    let backend = Arc::new(MemoryBackend::new());
    let users = CrudAbstractions::new("users", backend.clone());

    for (name, age) in [("ada", 36), ("bob", 41), ("cy", 29)] {
        let created = users
            .create()
            .run(record(json!({ "firstName": name, "age": age })))
            .await
            .unwrap();
        assert!(created.get("id").is_some_and(serde_json::Value::is_i64));
    }
    assert_eq!(backend.len("users"), 3);

    let oldest = users
        .get(Quantity::All)
        .order_by("age", Direction::Desc)
        .limit(2)
        .run()
        .await
        .unwrap()
        .into_records();
    let names: Vec<_> = oldest.iter().map(|r| r["firstName"].clone()).collect();
    assert_eq!(names, vec![json!("bob"), json!("ada")]);

    // form values arrive as text
    let updated = users
        .update()
        .filter("id", "2")
        .set(record(json!({ "age": 42 })))
        .run()
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["age"], json!(42));

    let one = users
        .get(Quantity::One)
        .filter("firstName", "bob")
        .run()
        .await
        .unwrap();
    assert!(matches!(one, Fetched::One(Some(ref r)) if r["age"] == json!(42)));

    let deleted = users.destroy().filter("age", 29).run().await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(backend.len("users"), 2);
}

/// Update and delete refuse to run without a filter
#[tokio::test]
async fn test_unfiltered_writes_are_refused() {
    let backend = Arc::new(MemoryBackend::new());
    let posts = CrudAbstractions::new("posts", backend.clone());
    posts
        .create()
        .run(record(json!({ "title": "kept" })))
        .await
        .unwrap();

    let update = posts
        .update()
        .set(record(json!({ "title": "lost" })))
        .run()
        .await;
    assert_eq!(
        update,
        Err(RuntimeError::MissingWhereClause {
            operation: "Update"
        })
    );

    let delete = posts.destroy().run().await;
    assert_eq!(
        delete,
        Err(RuntimeError::MissingWhereClause {
            operation: "Delete"
        })
    );

    assert_eq!(backend.len("posts"), 1);
}

/// Tables are isolated from each other
#[tokio::test]
async fn test_tables_are_isolated() {
    let backend = Arc::new(MemoryBackend::new());
    let users = CrudAbstractions::new("users", backend.clone());
    let posts = CrudAbstractions::new("posts", backend.clone());

    users.create().run(Record::new()).await.unwrap();

    assert_eq!(backend.len("users"), 1);
    assert!(backend.is_empty("posts"));
    let fetched = posts.get(Quantity::One).run().await.unwrap();
    assert_eq!(fetched, Fetched::One(None));
}
