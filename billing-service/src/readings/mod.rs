use billing_client::domain::NewElectricityRecord;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// How strictly incoming readings are checked before they are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingPolicy {
    /// Store whatever arrives; missing or unparseable values become NULL.
    #[default]
    PassThrough,
    /// Reject incomplete or implausible readings with a client error.
    Strict,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReadingError {
    #[error("missing or non-numeric field: {0}")]
    MissingField(&'static str),
    #[error("field {0} must be a finite number")]
    NotFinite(&'static str),
    #[error("end reading {end} is below start reading {start}")]
    Inverted { start: f64, end: f64 },
    #[error("rate must be non-negative")]
    NegativeRate,
    #[error("record_month {0:?} is not in yyyy-mm form")]
    MalformedMonth(String),
    #[error("request body must be a JSON object: {0}")]
    MalformedBody(String),
}

/// Body of `POST /addUser`.
///
/// Numbers may arrive as JSON numbers or strings holding a finite number;
/// anything else, `null` included, is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncomingReading {
    #[serde(default, deserialize_with = "lenient_number")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub end: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub record_month: Option<String>,
}

impl IncomingReading {
    /// Decode a request body.
    ///
    /// Bodies not declared as JSON, and empty JSON bodies, read as an empty
    /// object. A JSON body must otherwise be an object; arrays, scalars and
    /// malformed documents are rejected.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Result<Self, ReadingError> {
        if !content_type.is_some_and(is_json_content_type) {
            return Ok(Self::default());
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let object: Map<String, Value> =
            serde_json::from_slice(body).map_err(|e| ReadingError::MalformedBody(e.to_string()))?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| ReadingError::MalformedBody(e.to_string()))
    }
}

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

impl From<IncomingReading> for NewElectricityRecord {
    fn from(i: IncomingReading) -> Self {
        NewElectricityRecord::from_readings(i.start, i.end, i.rate, i.record_month)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Check a reading against `policy`. `PassThrough` accepts everything.
pub fn validate_reading(reading: &IncomingReading, policy: ReadingPolicy) -> Result<(), ReadingError> {
    if policy == ReadingPolicy::PassThrough {
        return Ok(());
    }

    let start = finite(reading.start, "start")?;
    let end = finite(reading.end, "end")?;
    let rate = finite(reading.rate, "rate")?;

    if end < start {
        return Err(ReadingError::Inverted { start, end });
    }
    if rate < 0.0 {
        return Err(ReadingError::NegativeRate);
    }

    let month = reading
        .record_month
        .as_deref()
        .ok_or(ReadingError::MissingField("record_month"))?;
    if !is_billing_month(month) {
        return Err(ReadingError::MalformedMonth(month.to_string()));
    }

    Ok(())
}

fn finite(value: Option<f64>, field: &'static str) -> Result<f64, ReadingError> {
    match value {
        None => Err(ReadingError::MissingField(field)),
        Some(v) if !v.is_finite() => Err(ReadingError::NotFinite(field)),
        Some(v) => Ok(v),
    }
}

/// `yyyy-mm` with a month between 01 and 12.
fn is_billing_month(month: &str) -> bool {
    let Some((year, mm)) = month.split_once('-') else {
        return false;
    };
    if year.len() != 4 || mm.len() != 2 {
        return false;
    }
    if !year.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(mm.parse::<u8>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> IncomingReading {
        serde_json::from_str(body).unwrap()
    }

    fn complete() -> IncomingReading {
        IncomingReading {
            start: Some(100.0),
            end: Some(150.0),
            rate: Some(4.5),
            record_month: Some("2024-08".to_string()),
        }
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let r = parse(r#"{"start": 100, "end": "150.5", "rate": " 4.5 ", "record_month": "2024-08"}"#);

        assert_eq!(r.start, Some(100.0));
        assert_eq!(r.end, Some(150.5));
        assert_eq!(r.rate, Some(4.5));
        assert_eq!(r.record_month.as_deref(), Some("2024-08"));
    }

    #[test]
    fn junk_and_missing_fields_become_absent() {
        let r = parse(r#"{"start": "abc", "rate": true, "record_month": null}"#);

        assert_eq!(r, IncomingReading::default());
    }

    #[test]
    fn non_finite_strings_become_absent() {
        let r = parse(r#"{"start": "inf", "end": "-infinity", "rate": "NaN"}"#);

        assert_eq!(r, IncomingReading::default());
    }

    #[test]
    fn null_reading_is_absent() {
        let r = parse(r#"{"start": null, "end": 150}"#);

        assert_eq!(r.start, None);
        assert_eq!(r.end, Some(150.0));
    }

    #[test]
    fn json_body_must_be_an_object() {
        for body in [r#"[1, 2]"#, "42", r#""text""#, "{not json"] {
            assert!(
                matches!(
                    IncomingReading::from_body(Some("application/json"), body.as_bytes()),
                    Err(ReadingError::MalformedBody(_))
                ),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn json_object_body_is_decoded() {
        let r = IncomingReading::from_body(
            Some("application/json; charset=utf-8"),
            br#"{"start": 100, "end": 150, "rate": 4.5, "record_month": "2024-08"}"#,
        )
        .unwrap();

        assert_eq!(r, complete());
    }

    #[test]
    fn undeclared_or_empty_body_reads_as_empty_object() {
        let json_body = br#"{"start": 1}"#;

        assert_eq!(
            IncomingReading::from_body(None, json_body).unwrap(),
            IncomingReading::default()
        );
        assert_eq!(
            IncomingReading::from_body(Some("text/plain"), json_body).unwrap(),
            IncomingReading::default()
        );
        assert_eq!(
            IncomingReading::from_body(Some("application/json"), b"  ").unwrap(),
            IncomingReading::default()
        );
    }

    #[test]
    fn vendor_json_content_type_is_json() {
        assert!(is_json_content_type("application/vnd.api+json"));
        assert!(is_json_content_type("Application/JSON"));
        assert!(!is_json_content_type("text/json"));
    }

    #[test]
    fn numeric_month_is_stringified() {
        let r = parse(r#"{"record_month": 202408}"#);
        assert_eq!(r.record_month.as_deref(), Some("202408"));
    }

    #[test]
    fn pass_through_accepts_anything() {
        let inverted = IncomingReading {
            start: Some(10.0),
            end: Some(5.0),
            ..IncomingReading::default()
        };

        assert!(validate_reading(&IncomingReading::default(), ReadingPolicy::PassThrough).is_ok());
        assert!(validate_reading(&inverted, ReadingPolicy::PassThrough).is_ok());
    }

    #[test]
    fn strict_accepts_complete_reading() {
        assert!(validate_reading(&complete(), ReadingPolicy::Strict).is_ok());
    }

    #[test]
    fn strict_rejects_missing_field() {
        let r = IncomingReading {
            rate: None,
            ..complete()
        };
        assert_eq!(
            validate_reading(&r, ReadingPolicy::Strict),
            Err(ReadingError::MissingField("rate"))
        );
    }

    #[test]
    fn strict_rejects_inverted_readings() {
        let r = IncomingReading {
            start: Some(200.0),
            ..complete()
        };
        assert!(matches!(
            validate_reading(&r, ReadingPolicy::Strict),
            Err(ReadingError::Inverted { .. })
        ));
    }

    #[test]
    fn strict_rejects_non_finite_and_negative_rate() {
        let nan = IncomingReading {
            end: Some(f64::NAN),
            ..complete()
        };
        assert_eq!(
            validate_reading(&nan, ReadingPolicy::Strict),
            Err(ReadingError::NotFinite("end"))
        );

        let negative = IncomingReading {
            rate: Some(-1.0),
            ..complete()
        };
        assert_eq!(
            validate_reading(&negative, ReadingPolicy::Strict),
            Err(ReadingError::NegativeRate)
        );
    }

    #[test]
    fn strict_checks_month_shape() {
        for bad in ["2024-8", "2024-13", "24-08", "2024/08", "2024-0a", "august"] {
            let r = IncomingReading {
                record_month: Some(bad.to_string()),
                ..complete()
            };
            assert!(
                matches!(
                    validate_reading(&r, ReadingPolicy::Strict),
                    Err(ReadingError::MalformedMonth(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn conversion_derives_usage_and_amount() {
        let rec: NewElectricityRecord = complete().into();
        assert_eq!(rec.usage, Some(50.0));
        assert_eq!(rec.amount, Some(225.0));
    }
}
