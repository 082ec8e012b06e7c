//! JSON-lines protocol on stdin/stdout

use dw_bridge::{MethodError, MethodResponse};
use serde::Deserialize;
use serde_json::{json, Value};

/// One line read from stdin
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Request {
    /// Command-channel method call
    Call {
        method: String,
        #[serde(default)]
        arguments: Value,
    },
    /// Ask the simulated host to decode a barcode
    SimulateScan {
        #[serde(rename = "simulateScan")]
        simulate_scan: ScanInput,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ScanInput {
    pub data: String,
    pub symbology: String,
}

pub fn parse_request(line: &str) -> Result<Request, serde_json::Error> {
    serde_json::from_str(line)
}

pub fn method_reply(result: &Result<MethodResponse, MethodError>) -> Value {
    match result {
        Ok(MethodResponse::Accepted) => json!({"response": "accepted"}),
        Ok(MethodResponse::NotImplemented) => json!({"response": "notImplemented"}),
        Err(e) => json!({"error": e.to_string()}),
    }
}

pub fn scan_line(event: Value) -> Value {
    json!({ "scan": event })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_call() {
        let request = parse_request(
            r#"{"method":"createDataWedgeProfile","arguments":"demo"}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::Call {
                method: "createDataWedgeProfile".into(),
                arguments: json!("demo"),
            }
        );
    }

    #[test]
    fn test_parse_call_without_arguments() {
        let request = parse_request(r#"{"method":"doSomethingUnknown"}"#).unwrap();
        assert!(matches!(request, Request::Call { arguments: Value::Null, .. }));
    }

    #[test]
    fn test_parse_simulated_scan() {
        let request =
            parse_request(r#"{"simulateScan":{"data":"0123456789","symbology":"EAN13"}}"#)
                .unwrap();
        assert_eq!(
            request,
            Request::SimulateScan {
                simulate_scan: ScanInput {
                    data: "0123456789".into(),
                    symbology: "EAN13".into(),
                }
            }
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_request("{}").is_err());
        assert!(parse_request("not json").is_err());
    }

    #[test]
    fn test_method_reply() {
        assert_eq!(
            method_reply(&Ok(MethodResponse::NotImplemented)),
            json!({"response": "notImplemented"})
        );
        let err = MethodError::InvalidArguments {
            method: "m".into(),
            reason: "r".into(),
        };
        assert_eq!(
            method_reply(&Err(err)),
            json!({"error": "Invalid arguments for m: r"})
        );
    }
}
