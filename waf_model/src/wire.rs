// JSON wire codec and the serde helpers for fields whose wire form differs
// from their Rust type (binary payloads and timestamps).

use crate::error::ModelError;
use crate::validation::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Validates `value` and serializes it. Absent optional fields are omitted.
pub fn encode<T: Serialize + Validate>(value: &T) -> Result<String, ModelError> {
    value.validate()?;
    encode_unvalidated(value)
}

/// Validates `value` and converts it to a JSON tree.
pub fn encode_value<T: Serialize + Validate>(value: &T) -> Result<Value, ModelError> {
    value.validate()?;
    serde_json::to_value(value).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Serializes without the required-field check. Responses go through here:
/// the model accepts partially populated values coming back from the service.
pub fn encode_unvalidated<T: Serialize>(value: &T) -> Result<String, ModelError> {
    serde_json::to_string(value).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Parses a JSON body.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ModelError> {
    serde_json::from_str(text).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Converts an already parsed JSON tree.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, ModelError> {
    serde_json::from_value(value).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Binary fields travel as standard base64 text.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(text) => STANDARD
                .decode(text.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Whole-second timestamps are written as Unix epoch seconds, finer ones as
/// an RFC 3339 UTC string so no precision is lost. Both are read back, along
/// with fractional epoch seconds and the minute-precision ISO-8601 form.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NANOS_PER_SECOND: f64 = 1e9;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Whole(i64),
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(at: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) if at.timestamp_subsec_nanos() == 0 => s.serialize_i64(at.timestamp()),
            Some(at) => s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<Raw>::deserialize(d)? {
            None => Ok(None),
            Some(Raw::Whole(seconds)) => DateTime::<Utc>::from_timestamp(seconds, 0)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {seconds}"))),
            Some(Raw::Seconds(seconds)) => from_epoch(seconds)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {seconds}"))),
            Some(Raw::Text(text)) => parse(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {text}"))),
        }
    }

    /// Splits fractional epoch seconds into whole seconds and nanoseconds.
    pub fn from_epoch(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }
        let mut whole = seconds.trunc();
        let mut nanos = (seconds.fract() * NANOS_PER_SECOND).round();
        if nanos < 0.0 {
            whole -= 1.0;
            nanos += NANOS_PER_SECOND;
        }
        if nanos >= NANOS_PER_SECOND {
            whole += 1.0;
            nanos -= NANOS_PER_SECOND;
        }
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return None;
        }
        DateTime::<Utc>::from_timestamp(whole as i64, nanos as u32)
    }

    /// Accepts RFC 3339 and the minute-precision `2016-09-27T14:50Z` form.
    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Some(at.with_timezone(&Utc));
        }
        let naive = text.strip_suffix('Z')?;
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
            .map(|at| at.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        #[serde(
            rename = "Bytes",
            default,
            skip_serializing_if = "Option::is_none",
            with = "base64_bytes"
        )]
        bytes: Option<Vec<u8>>,
        #[serde(
            rename = "At",
            default,
            skip_serializing_if = "Option::is_none",
            with = "timestamp"
        )]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_bytes_survive_nul_and_non_utf8() {
        let raw = vec![0x00, 0xff, 0xfe, b'a', 0x00, 0x80, 0xc3];
        let payload = Payload { bytes: Some(raw.clone()), at: None };
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(text, r#"{"Bytes":"AP/+YQCAww=="}"#);

        let back: Payload = serde_json::from_str(&text).unwrap();
        assert_eq!(back.bytes, Some(raw));
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let result: Result<Payload, _> = serde_json::from_value(json!({"Bytes": "not base64!"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_writes_epoch_seconds() {
        let at = Utc.with_ymd_and_hms(2016, 9, 27, 14, 50, 0).unwrap();
        let payload = Payload { bytes: None, at: Some(at) };
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"At": 1474987800}));
    }

    #[test]
    fn test_timestamp_reads_all_accepted_forms() {
        let expected = Utc.with_ymd_and_hms(2016, 9, 27, 14, 50, 0).unwrap();
        for raw in [
            json!(1474987800),
            json!(1474987800.0),
            json!("2016-09-27T14:50Z"),
            json!("2016-09-27T14:50:00Z"),
            json!("2016-09-27T14:50:00.000Z"),
        ] {
            let payload: Payload = serde_json::from_value(json!({ "At": raw })).unwrap();
            assert_eq!(payload.at, Some(expected), "failed on {raw}");
        }
    }

    #[test]
    fn test_fractional_seconds_keep_millis() {
        let payload: Payload = serde_json::from_value(json!({"At": 1474987800.25})).unwrap();
        assert_eq!(payload.at.unwrap().timestamp_subsec_millis(), 250);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"At": "2016-09-27T14:50:00.250Z"})
        );
    }

    #[test]
    fn test_nanosecond_timestamp_survives_the_wire() {
        let at = Utc.with_ymd_and_hms(2016, 9, 27, 14, 50, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let payload = Payload { bytes: None, at: Some(at) };
        let text = encode_unvalidated(&payload).unwrap();
        assert_eq!(text, r#"{"At":"2016-09-27T14:50:00.123456789Z"}"#);

        let back: Payload = decode(&text).unwrap();
        assert_eq!(back.at, Some(at));

        let window = crate::TimeWindow::ending_at(at, chrono::Duration::hours(3));
        let window: crate::TimeWindow = decode(&encode_unvalidated(&window).unwrap()).unwrap();
        assert!(window.contains(&at));
    }

    #[test]
    fn test_epoch_fraction_below_zero_rolls_back_a_second() {
        let at = timestamp::from_epoch(-1.5).unwrap();
        assert_eq!(at.timestamp(), -2);
        assert_eq!(at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let payload = Payload { bytes: None, at: None };
        assert_eq!(encode_unvalidated(&payload).unwrap(), "{}");
        let back: Payload = decode("{}").unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_decode_reports_serialization_error() {
        let result: Result<Payload, ModelError> = decode("{not json");
        assert!(matches!(result, Err(ModelError::Serialization(_))));
    }
}
