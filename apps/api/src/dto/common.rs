use serde::{Deserialize, Deserializer, Serialize};

/// Health probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Acknowledgement payload for deletes and read-state mutations.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Deserializes a field that distinguishes "absent" from "explicit null".
///
/// Used with `#[serde(default, deserialize_with = "double_option")]` on
/// `Option<Option<T>>` fields: a missing key stays `None`, `null` becomes
/// `Some(None)`, and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::double_option;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "double_option")]
        remarks: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Payload = match serde_json::from_str("{}") {
            Ok(payload) => payload,
            Err(error) => panic!("absent case failed: {error}"),
        };
        assert_eq!(absent.remarks, None);

        let null: Payload = match serde_json::from_str(r#"{"remarks": null}"#) {
            Ok(payload) => payload,
            Err(error) => panic!("null case failed: {error}"),
        };
        assert_eq!(null.remarks, Some(None));

        let value: Payload = match serde_json::from_str(r#"{"remarks": "ok"}"#) {
            Ok(payload) => payload,
            Err(error) => panic!("value case failed: {error}"),
        };
        assert_eq!(value.remarks, Some(Some("ok".to_owned())));
    }
}
