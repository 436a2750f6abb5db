//! JSON rendering of reads (requires the `serde` feature)
#![cfg(feature = "serde")]

use cellgrid::prelude::*;

#[test]
fn test_reading_serializes_flat() {
    let mut sheet = Sheet::new();
    sheet.set("A1", 2).unwrap();
    sheet.set("A2", "=A1/4").unwrap();
    sheet.set("A3", "=Q1+1").unwrap();

    let json = serde_json::to_string(&sheet.get("A2").unwrap()).unwrap();
    assert_eq!(json, r#"{"value":"=A1/4","result":0.5}"#);

    let json = serde_json::to_string(&sheet.get("A3").unwrap()).unwrap();
    assert_eq!(json, r#"{"value":"=Q1+1","result":"ERROR"}"#);

    let json = serde_json::to_string(&sheet.get("C3").unwrap()).unwrap();
    assert_eq!(json, r#"{"value":null,"result":null}"#);
}
