use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

fn serialize_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let formatted = date.format(DATE_FORMAT).to_string();
    serializer.serialize_str(&formatted)
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    #[serde(rename = "isPresent")]
    pub is_present: bool,
}

impl Attendee {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            is_present: false,
        }
    }
}

/// A scheduled occurrence. `time` is a free-form display string and takes
/// part in conflict detection by exact string equality only; `date` carries
/// the full timestamp that equality and the upcoming/past partition use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    pub date: NaiveDateTime,
    pub time: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_event() -> Event {
        Event {
            title: "Team offsite".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            time: "10:00".into(),
            location: "Berlin".into(),
            description: "Planning for Q2".into(),
            attendees: vec![
                Attendee::new("Ada"),
                Attendee {
                    name: "Grace".into(),
                    is_present: true,
                },
            ],
        }
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn date_serializes_with_milliseconds() {
        let json = serde_json::to_string(&sample_event()).unwrap();
        assert!(json.contains("\"2024-03-15T00:00:00.000\""));
    }

    #[test]
    fn date_parses_without_fractional_seconds() {
        let json = r#"{
            "title": "x", "date": "2024-03-15T00:00:00",
            "time": "10:00", "location": "", "description": ""
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.date, sample_event().date);
    }

    #[test]
    fn missing_attendees_defaults_to_empty() {
        let json = r#"{
            "title": "x", "date": "2024-03-15T00:00:00.000",
            "time": "10:00", "location": "here", "description": "d"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.attendees.is_empty());
    }

    #[test]
    fn missing_date_is_rejected() {
        let json = r#"{"title": "x", "time": "10:00", "location": "", "description": ""}"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let json = r#"{
            "title": "x", "date": "not-a-date",
            "time": "10:00", "location": "", "description": ""
        }"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
    }

    #[test]
    fn attendee_requires_both_fields() {
        assert!(serde_json::from_str::<Attendee>(r#"{"name": "Ada"}"#).is_err());
        assert!(serde_json::from_str::<Attendee>(r#"{"isPresent": false}"#).is_err());
        assert!(serde_json::from_str::<Attendee>(r#"{"name": "Ada", "isPresent": "yes"}"#).is_err());
    }

    #[test]
    fn new_attendee_starts_absent() {
        assert!(!Attendee::new("Ada").is_present);
    }
}
