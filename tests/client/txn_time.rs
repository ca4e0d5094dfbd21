//! Tier 2: Transaction Time

use crate::test_utils::*;
use std::sync::Arc;
use std::thread;

/// The first request carries no time; later ones carry the latest seen
#[test]
fn test_last_seen_threaded_through() {
    let scripted = Scripted::new()
        .reply_at(200, r#"{"resource": null}"#, Some(1_000))
        .reply_at(200, r#"{"resource": null}"#, Some(900))
        .reply(200, r#"{"resource": null}"#);
    let client = client(scripted);

    for _ in 0..3 {
        client.query(Expr::null()).unwrap();
    }

    let seen: Vec<Option<i64>> = client
        .transport()
        .requests()
        .iter()
        .map(|r| r.last_seen_txn)
        .collect();
    assert_eq!(seen, vec![None, Some(1_000), Some(1_000)]);
    assert_eq!(client.last_txn_time(), Some(1_000));
}

/// Error replies still advance the time
#[test]
fn test_error_reply_advances_time() {
    let scripted = Scripted::new().reply_at(404, r#"{"errors": []}"#, Some(42));
    let client = client(scripted);
    assert!(client.query(Expr::null()).is_err());
    assert_eq!(client.last_txn_time(), Some(42));
}

/// Concurrent updates keep the maximum
#[test]
fn test_concurrent_sync_keeps_max() {
    let client = Arc::new(client(Scripted::new()));
    let handles: Vec<_> = (1..=8)
        .map(|t| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for i in 0..1_000 {
                    client.sync_last_txn_time(t * 1_000 + i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(client.last_txn_time(), Some(8_999));
}
