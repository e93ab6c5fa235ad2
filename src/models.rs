use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One entry of `races`, kept as raw JSON so a rewrite leaves races other
/// than the one being signed up for exactly as they were.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct Race(Value);

impl Race {
    /// Only string ids can match a signup.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Runner names; a missing or non-array `runners` reads as empty.
    /// Non-string entries are an error.
    pub fn runners(&self) -> Result<Vec<String>, String> {
        match self.0.get("runners") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| format!("runner entry is not a string: {item}"))
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    pub fn set_runners(&mut self, runners: &[String]) {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert("runners".to_string(), serde_json::json!(runners));
        }
    }
}

/// The whole races file. Top-level fields other than `races` are carried
/// through untouched, and `races` is written back in its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RacesDocument {
    pub races: Vec<Race>,
    fields: Map<String, Value>,
}

impl Serialize for RacesDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = self.fields.clone();
        if fields.contains_key("races") || !self.races.is_empty() {
            let races = serde_json::to_value(&self.races).map_err(serde::ser::Error::custom)?;
            fields.insert("races".to_string(), races);
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RacesDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let races = match fields.get("races") {
            None | Some(Value::Null) => Vec::new(),
            Some(races) => Vec::<Race>::deserialize(races).map_err(serde::de::Error::custom)?,
        };
        Ok(Self { races, fields })
    }
}

/// Current content of a remote file plus the version token it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub content: String,
    pub sha: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub race_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub ok: bool,
    pub race_id: String,
    pub name: String,
    pub runners: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub week: u32,
    pub parity: &'static str,
    pub saturday_location: &'static str,
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_runners_read_as_empty() {
        let doc: RacesDocument = serde_json::from_str(
            r#"{"races":[{"id":"a","runners":"nope"},{"id":"b","runners":null},{"id":"c"}]}"#,
        )
        .unwrap();
        assert!(doc.races.iter().all(|race| race.runners().unwrap().is_empty()));
    }

    #[test]
    fn non_string_runner_is_an_error() {
        let race: Race = serde_json::from_str(r#"{"id":"a","runners":["Ann",{"bib":7}]}"#).unwrap();
        assert!(race.runners().is_err());
    }

    #[test]
    fn non_string_ids_never_match() {
        let doc: RacesDocument =
            serde_json::from_str(r#"{"races":[{"id":2025,"runners":[]},"oops",{"id":"5k"}]}"#)
                .unwrap();
        let ids: Vec<_> = doc.races.iter().map(Race::id).collect();
        assert_eq!(ids, vec![None, None, Some("5k")]);
    }

    #[test]
    fn document_round_trips_unchanged() {
        let raw = r#"{"title":"Fall","races":[{"date":"2026-10-03","id":"5k","runners":["Ann",7]},{"id":"relay","runners":{"team":"A"}},{"id":"trail"}]}"#;
        let doc: RacesDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), raw);
    }

    #[test]
    fn signup_request_uses_camel_case() {
        let request: SignupRequest =
            serde_json::from_str(r#"{"raceId":"5k","name":" Jane "}"#).unwrap();
        assert_eq!(request.race_id.as_deref(), Some("5k"));
        assert_eq!(request.name.as_deref(), Some(" Jane "));
    }
}
