use super::{short_hash_hex, stable_hash_hex};
use serde_json::json;

#[test]
fn stable_hash_ignores_ordering() {
    let left = json!({"b":2,"a":1});
    let right = json!({"a":1,"b":2});
    let left_hash = stable_hash_hex(&left).expect("hash");
    let right_hash = stable_hash_hex(&right).expect("hash");
    assert_eq!(left_hash, right_hash);
    assert_eq!(left_hash.len(), 64);
}

#[test]
fn short_hash_is_a_prefix_of_the_full_digest() {
    let short = short_hash_hex("number", 16);
    assert_eq!(short.len(), 16);
    assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(short, short_hash_hex("number", 16));
    assert_ne!(short, short_hash_hex("string", 16));
}
