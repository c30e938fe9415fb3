//! JWK record types and shape validation
//!
//! The tools accept exactly one key shape: a public EC P-384 signing key.
//! `validate` checks an arbitrary parsed JSON value against that shape and,
//! on mismatch, reports every field-level violation at once instead of
//! stopping at the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{JwksError, Result};

/// Fixed `kty` literal
pub const KEY_TYPE: &str = "EC";
/// Fixed `crv` literal
pub const CURVE: &str = "P-384";
/// Fixed `alg` literal
pub const ALGORITHM: &str = "ES384";
/// Fixed `use` literal
pub const USAGE: &str = "sig";
/// The only operation a published key may carry
pub const PUBLIC_KEY_OP: &str = "verify";
/// The operation printed on the private half at generation time
pub const PRIVATE_KEY_OP: &str = "sign";

/// Complete set of fields a key file may contain
const FIELDS: [&str; 10] = [
    "kty", "crv", "alg", "x", "y", "key_ops", "use", "kid", "iat", "exp",
];

/// One EC P-384 signing key record as stored on disk
///
/// Field order matches the on-disk serialization the generator writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    pub alg: String,
    pub x: String,
    pub y: String,
    pub key_ops: Vec<String>,
    #[serde(rename = "use")]
    pub usage: String,
    pub kid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The private variant of a generated key
///
/// Only ever serialized to the console; never written to a file and never
/// accepted by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateJwk {
    pub kty: String,
    pub crv: String,
    pub alg: String,
    pub x: String,
    pub y: String,
    pub d: String,
    pub key_ops: Vec<String>,
    #[serde(rename = "use")]
    pub usage: String,
    pub kid: String,
}

/// The projection of a key published into a key set: exactly the eight
/// canonical fields, in the order they appear in the dist documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedJwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub usage: String,
    pub key_ops: Vec<String>,
    pub alg: String,
    pub kid: String,
    pub crv: String,
    pub x: String,
    pub y: String,
}

/// A published key-set document: `{ "keys": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<PublishedJwk>,
}

impl Jwk {
    /// Time-validity filter: a key is valid unless its `iat` lies in the
    /// future or its `exp` lies in the past. Records without either field
    /// pass unconditionally; `iat == now` and `exp == now` both pass.
    pub fn is_valid_at(&self, now: i64) -> bool {
        if self.iat.is_some_and(|iat| iat > now) {
            return false;
        }
        if self.exp.is_some_and(|exp| exp < now) {
            return false;
        }
        true
    }

    /// Strip the record down to the eight canonical published fields
    pub fn to_published(&self) -> PublishedJwk {
        PublishedJwk {
            kty: self.kty.clone(),
            usage: self.usage.clone(),
            key_ops: self.key_ops.clone(),
            alg: self.alg.clone(),
            kid: self.kid.clone(),
            crv: self.crv.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

/// One field-level schema violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` must be \"{expected}\", found {found}")]
    WrongValue {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("field `key_ops` must be exactly [\"verify\"]")]
    MalformedKeyOps,

    #[error("unexpected field `{0}`")]
    UnexpectedField(String),

    #[error("value is not a JSON object")]
    NotAnObject,
}

/// Validate an arbitrary parsed JSON value against the public JWK shape.
///
/// Pure; returns `Ok(())` only when the value matches the schema exactly:
/// all required fields present with the fixed literal values, `key_ops`
/// exactly `["verify"]`, optional integer `iat`/`exp`, and no field outside
/// the fixed set. On mismatch every individual violation is aggregated into
/// one [`JwksError::InvalidJwk`].
pub fn validate(value: &Value) -> Result<()> {
    let violations = check(value);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(JwksError::invalid_jwk(violations))
    }
}

/// Validate and deserialize a JSON value into a [`Jwk`]
pub fn parse(value: &Value) -> Result<Jwk> {
    validate(value)?;
    Ok(serde_json::from_value(value.clone())?)
}

fn check(value: &Value) -> Vec<Violation> {
    let Some(obj) = value.as_object() else {
        return vec![Violation::NotAnObject];
    };

    let mut violations = Vec::new();

    expect_literal(obj, "kty", KEY_TYPE, &mut violations);
    expect_literal(obj, "crv", CURVE, &mut violations);
    expect_literal(obj, "alg", ALGORITHM, &mut violations);
    expect_string(obj, "x", &mut violations);
    expect_string(obj, "y", &mut violations);
    check_key_ops(obj, &mut violations);
    expect_literal(obj, "use", USAGE, &mut violations);
    expect_string(obj, "kid", &mut violations);
    expect_timestamp(obj, "iat", &mut violations);
    expect_timestamp(obj, "exp", &mut violations);

    for field in obj.keys() {
        if !FIELDS.contains(&field.as_str()) {
            violations.push(Violation::UnexpectedField(field.clone()));
        }
    }

    violations
}

fn expect_literal(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    expected: &'static str,
    out: &mut Vec<Violation>,
) {
    match obj.get(field) {
        None => out.push(Violation::MissingField(field)),
        Some(Value::String(s)) if s == expected => {}
        Some(found) => out.push(Violation::WrongValue {
            field,
            expected,
            found: found.to_string(),
        }),
    }
}

fn expect_string(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    out: &mut Vec<Violation>,
) {
    match obj.get(field) {
        None => out.push(Violation::MissingField(field)),
        Some(Value::String(_)) => {}
        Some(_) => out.push(Violation::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn expect_timestamp(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    out: &mut Vec<Violation>,
) {
    match obj.get(field) {
        None => {}
        Some(value) if value.as_i64().is_some() => {}
        Some(_) => out.push(Violation::WrongType {
            field,
            expected: "integer timestamp",
        }),
    }
}

fn check_key_ops(obj: &serde_json::Map<String, Value>, out: &mut Vec<Violation>) {
    match obj.get("key_ops") {
        None => out.push(Violation::MissingField("key_ops")),
        Some(Value::Array(ops))
            if ops.len() == 1 && ops[0].as_str() == Some(PUBLIC_KEY_OP) => {}
        Some(_) => out.push(Violation::MalformedKeyOps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "kty": "EC",
            "crv": "P-384",
            "alg": "ES384",
            "x": "base64url-x",
            "y": "base64url-y",
            "key_ops": ["verify"],
            "use": "sig",
            "kid": "ab12_1722470400",
        })
    }

    fn violations_of(value: &Value) -> Vec<Violation> {
        match validate(value) {
            Err(JwksError::InvalidJwk { violations, .. }) => violations,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(()) => panic!("expected validation failure"),
        }
    }

    mod unit {
        use super::*;

        #[test]
        fn test_valid_jwk_passes() {
            assert!(validate(&sample()).is_ok());
        }

        #[test]
        fn test_valid_jwk_with_timestamps_passes() {
            let mut value = sample();
            value["iat"] = json!(1722470400);
            value["exp"] = json!(1754006400);
            assert!(validate(&value).is_ok());
        }

        #[test]
        fn test_missing_required_field() {
            let mut value = sample();
            value.as_object_mut().unwrap().remove("alg");
            assert_eq!(violations_of(&value), vec![Violation::MissingField("alg")]);
        }

        #[test]
        fn test_wrong_literal_is_value_checked() {
            let mut value = sample();
            value["kty"] = json!("RSA");
            assert_eq!(
                violations_of(&value),
                vec![Violation::WrongValue {
                    field: "kty",
                    expected: "EC",
                    found: "\"RSA\"".to_string(),
                }]
            );
        }

        #[test]
        fn test_wrong_curve_rejected() {
            let mut value = sample();
            value["crv"] = json!("P-256");
            assert_eq!(violations_of(&value).len(), 1);
        }

        #[test]
        fn test_unexpected_field_rejected() {
            let mut value = sample();
            value["ext"] = json!(true);
            assert_eq!(
                violations_of(&value),
                vec![Violation::UnexpectedField("ext".to_string())]
            );
        }

        #[test]
        fn test_private_scalar_rejected() {
            let mut value = sample();
            value["d"] = json!("secret-bytes");
            assert_eq!(
                violations_of(&value),
                vec![Violation::UnexpectedField("d".to_string())]
            );
        }

        #[test]
        fn test_key_ops_wrong_operation() {
            let mut value = sample();
            value["key_ops"] = json!(["sign"]);
            assert_eq!(violations_of(&value), vec![Violation::MalformedKeyOps]);
        }

        #[test]
        fn test_key_ops_wrong_cardinality() {
            let mut value = sample();
            value["key_ops"] = json!(["verify", "sign"]);
            assert_eq!(violations_of(&value), vec![Violation::MalformedKeyOps]);

            value["key_ops"] = json!([]);
            assert_eq!(violations_of(&value), vec![Violation::MalformedKeyOps]);
        }

        #[test]
        fn test_key_ops_not_an_array() {
            let mut value = sample();
            value["key_ops"] = json!("verify");
            assert_eq!(violations_of(&value), vec![Violation::MalformedKeyOps]);
        }

        #[test]
        fn test_non_integer_timestamp_rejected() {
            let mut value = sample();
            value["iat"] = json!("1722470400");
            assert_eq!(
                violations_of(&value),
                vec![Violation::WrongType {
                    field: "iat",
                    expected: "integer timestamp",
                }]
            );
        }

        #[test]
        fn test_non_object_rejected() {
            assert_eq!(violations_of(&json!([1, 2])), vec![Violation::NotAnObject]);
            assert_eq!(violations_of(&json!("jwk")), vec![Violation::NotAnObject]);
        }

        #[test]
        fn test_all_violations_reported_at_once() {
            let mut value = sample();
            let obj = value.as_object_mut().unwrap();
            obj.remove("alg");
            obj.remove("kid");
            obj.insert("kty".to_string(), json!("RSA"));
            obj.insert("extra".to_string(), json!(1));

            let violations = violations_of(&value);
            assert_eq!(violations.len(), 4);
            assert!(violations.contains(&Violation::MissingField("alg")));
            assert!(violations.contains(&Violation::MissingField("kid")));
            assert!(violations.contains(&Violation::UnexpectedField("extra".to_string())));
            assert!(violations.iter().any(|v| matches!(
                v,
                Violation::WrongValue { field: "kty", .. }
            )));
        }

        #[test]
        fn test_parse_roundtrip() {
            let mut value = sample();
            value["iat"] = json!(100);
            let jwk = parse(&value).unwrap();
            assert_eq!(jwk.kty, "EC");
            assert_eq!(jwk.usage, "sig");
            assert_eq!(jwk.iat, Some(100));
            assert_eq!(jwk.exp, None);
        }

        #[test]
        fn test_validity_window_unbounded() {
            let jwk = parse(&sample()).unwrap();
            assert!(jwk.is_valid_at(0));
            assert!(jwk.is_valid_at(i64::MAX));
        }

        #[test]
        fn test_validity_iat_boundary() {
            let mut value = sample();
            value["iat"] = json!(1000);
            let jwk = parse(&value).unwrap();

            assert!(!jwk.is_valid_at(999), "iat one second ahead is not yet valid");
            assert!(jwk.is_valid_at(1000), "iat equal to now is valid");
            assert!(jwk.is_valid_at(1001));
        }

        #[test]
        fn test_validity_exp_boundary() {
            let mut value = sample();
            value["exp"] = json!(1000);
            let jwk = parse(&value).unwrap();

            assert!(jwk.is_valid_at(999));
            assert!(jwk.is_valid_at(1000), "exp equal to now is still valid");
            assert!(!jwk.is_valid_at(1001), "exp one second behind is expired");
        }

        #[test]
        fn test_to_published_drops_timestamps() {
            let mut value = sample();
            value["iat"] = json!(100);
            value["exp"] = json!(200);
            let published = parse(&value).unwrap().to_published();

            let rendered = serde_json::to_value(&published).unwrap();
            let fields: Vec<&str> = rendered.as_object().unwrap().keys().map(String::as_str).collect();
            assert_eq!(fields.len(), 8);
            assert!(!fields.contains(&"iat"));
            assert!(!fields.contains(&"exp"));
        }

        #[test]
        fn test_published_serialization_order() {
            let published = parse(&sample()).unwrap().to_published();
            let rendered = serde_json::to_string(&published).unwrap();
            assert!(rendered.starts_with(
                "{\"kty\":\"EC\",\"use\":\"sig\",\"key_ops\":[\"verify\"],\"alg\":\"ES384\",\"kid\":"
            ));
        }

        #[test]
        fn test_jwk_serialization_order_matches_key_file() {
            let mut value = sample();
            value["iat"] = json!(100);
            let rendered = serde_json::to_string(&parse(&value).unwrap()).unwrap();
            assert!(rendered.starts_with("{\"kty\":\"EC\",\"crv\":\"P-384\",\"alg\":\"ES384\",\"x\":"));
            assert!(rendered.ends_with("\"iat\":100}"));
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_any_kid_string_accepted(kid in "\\PC*") {
                let mut value = sample();
                value["kid"] = json!(kid);
                prop_assert!(validate(&value).is_ok());
            }

            #[test]
            fn test_any_unknown_field_rejected(field in "[a-z_]{1,12}") {
                prop_assume!(!FIELDS.contains(&field.as_str()));
                let mut value = sample();
                value[&field] = json!("anything");
                prop_assert!(validate(&value).is_err());
            }

            #[test]
            fn test_integer_timestamps_accepted(iat in any::<i32>(), exp in any::<i32>()) {
                let mut value = sample();
                value["iat"] = json!(iat);
                value["exp"] = json!(exp);
                prop_assert!(validate(&value).is_ok());
            }

            #[test]
            fn test_validity_filter_total(iat in any::<i64>(), now in any::<i64>()) {
                let mut value = sample();
                value["iat"] = json!(iat);
                let jwk = parse(&value).unwrap();
                prop_assert_eq!(jwk.is_valid_at(now), iat <= now);
            }
        }
    }
}
