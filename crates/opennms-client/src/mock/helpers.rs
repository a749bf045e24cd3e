//! Builders for OpenNMS collection envelopes

use serde_json::{json, Value};

/// API v1 envelope: a single record is stored bare, several as an array
pub fn envelope(key: &str, records: Vec<Value>) -> Value {
    let count = records.len();
    let mut body = json!({"count": count, "totalCount": count, "offset": 0});
    match count {
        0 => {}
        1 => body[key] = records.into_iter().next().unwrap_or(Value::Null),
        _ => body[key] = Value::Array(records),
    }
    body
}

/// Envelope that always stores records as an array, even for one record
pub fn array_envelope(key: &str, records: Vec<Value>) -> Value {
    let count = records.len();
    json!({"count": count, "totalCount": count, "offset": 0, key: records})
}

/// Minimal node record
pub fn node_record(id: u64, label: &str) -> Value {
    json!({"id": id.to_string(), "label": label, "type": "A", "labelSource": "U"})
}

pub fn snmp_interface_record(id: u64, if_index: i32) -> Value {
    json!({
        "id": id,
        "ifIndex": if_index,
        "ifName": format!("eth{if_index}"),
        "ifAdminStatus": 1,
        "ifOperStatus": 1,
        "collectFlag": "C",
    })
}

pub fn ip_interface_record(id: u64, address: &str) -> Value {
    json!({"id": id, "ipAddress": address, "isManaged": "M", "snmpPrimary": "P"})
}

pub fn service_record(id: u64, name: &str) -> Value {
    json!({"id": id, "status": "A", "serviceType": {"id": id, "name": name}})
}
