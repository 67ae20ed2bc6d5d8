//! Turning a GeoJSON body into at most one `Event`.
//!
//! # Design
//! `try_extract_event` reports why a body was rejected; `extract_event` logs
//! that reason and collapses it into `None`. Both return `None` for an empty
//! body without parsing, and for an empty `features` array without logging.

use tracing::error;

use crate::error::ApiError;
use crate::types::{Event, Feature, FeatureCollection, TsunamiAlert};

/// Extract the first feature of `body` as an `Event`.
///
/// `Ok(None)` means "no record": the body was empty or held no features.
pub fn try_extract_event(body: &str) -> Result<Option<Event>, ApiError> {
    if body.is_empty() {
        return Ok(None);
    }

    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    let Some(first) = collection.features.into_iter().next() else {
        return Ok(None);
    };
    let feature: Feature =
        serde_json::from_value(first).map_err(|e| ApiError::Deserialization(format!("features[0]: {e}")))?;

    let props = feature.properties;
    Ok(Some(Event::new(
        props.title,
        props.time,
        TsunamiAlert::from_code(props.tsunami),
    )))
}

/// Like `try_extract_event`, but parse failures are logged and become `None`.
pub fn extract_event(body: &str) -> Option<Event> {
    match try_extract_event(body) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "problem parsing the earthquake JSON results");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_FEATURE: &str = r#"{"features":[{"properties":{"title":"M 6.1 - 89km ...","time":1338289562000,"tsunami":1}}]}"#;

    #[test]
    fn first_feature_becomes_event() {
        let event = try_extract_event(ONE_FEATURE).unwrap().unwrap();
        assert_eq!(event, Event::new("M 6.1 - 89km ...", 1_338_289_562_000, TsunamiAlert::Alert));
    }

    #[test]
    fn empty_features_is_no_record() {
        assert_eq!(try_extract_event(r#"{"features":[]}"#).unwrap(), None);
        assert_eq!(extract_event(r#"{"features":[]}"#), None);
    }

    #[test]
    fn empty_body_is_no_record() {
        assert_eq!(try_extract_event("").unwrap(), None);
    }

    #[test]
    fn only_first_feature_is_read() {
        let body = r#"{"features":[
            {"properties":{"title":"first","time":2,"tsunami":0}},
            {"properties":{"title":"second","time":1,"tsunami":1}},
            "not even an object"
        ]}"#;
        let event = extract_event(body).unwrap();
        assert_eq!(event.title(), "first");
        assert_eq!(event.time(), 2);
        assert_eq!(event.tsunami_alert(), TsunamiAlert::None);
    }

    #[test]
    fn unknown_alert_code_is_kept() {
        let body = r#"{"features":[{"properties":{"title":"t","time":0,"tsunami":-1}}]}"#;
        assert_eq!(extract_event(body).unwrap().tsunami_alert(), TsunamiAlert::Unknown(-1));
    }

    #[test]
    fn missing_features_is_deserialization_error() {
        let err = try_extract_event(r#"{"type":"FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
        assert_eq!(extract_event(r#"{"type":"FeatureCollection"}"#), None);
    }

    #[test]
    fn missing_property_is_deserialization_error() {
        for body in [
            r#"{"features":[{"properties":{"time":1,"tsunami":0}}]}"#,
            r#"{"features":[{"properties":{"title":"t","tsunami":0}}]}"#,
            r#"{"features":[{"properties":{"title":"t","time":1}}]}"#,
            r#"{"features":[{"geometry":null}]}"#,
        ] {
            let err = try_extract_event(body).unwrap_err();
            assert!(matches!(err, ApiError::Deserialization(_)), "{body}");
            assert_eq!(extract_event(body), None, "{body}");
        }
    }

    #[test]
    fn malformed_json_is_no_record() {
        assert_eq!(extract_event("{\"features\":[{"), None);
        assert_eq!(extract_event("<html>503</html>"), None);
    }

    #[test]
    fn null_title_is_rejected() {
        let body = r#"{"features":[{"properties":{"title":null,"time":1,"tsunami":0}}]}"#;
        assert!(try_extract_event(body).is_err());
    }
}
