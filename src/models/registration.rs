use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier for a registration
///
/// The server decides whether ids are numbers or strings; the client keeps
/// whichever form it received so updates address the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrationId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationId::Number(n) => write!(f, "{}", n),
            RegistrationId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RegistrationId {
    fn from(n: u64) -> Self {
        RegistrationId::Number(n)
    }
}

impl From<&str> for RegistrationId {
    /// Numeric strings become `Number` ids, everything else stays text
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => RegistrationId::Number(n),
            Err(_) => RegistrationId::Text(s.to_string()),
        }
    }
}

/// Attendance status of a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<serde_json::Value>", into = "String")]
pub enum Status {
    Registered,
    Attended,
    Cancelled,
    /// Anything the server sent that is not one of the known values
    /// (empty for a missing or null status)
    Other(String),
}

impl Status {
    /// Statuses offered by the form, in cycling order
    pub const CHOICES: [Status; 3] = [Status::Registered, Status::Attended, Status::Cancelled];

    pub fn label(&self) -> &str {
        match self {
            Status::Registered => "Registered",
            Status::Attended => "Attended",
            Status::Cancelled => "Cancelled",
            Status::Other(s) => s,
        }
    }

    /// Next status in the form's select cycle
    /// Unknown values enter the cycle at the first choice
    pub fn next(&self) -> Status {
        match self {
            Status::Registered => Status::Attended,
            Status::Attended => Status::Cancelled,
            Status::Cancelled | Status::Other(_) => Status::Registered,
        }
    }

    /// Previous status in the form's select cycle
    pub fn previous(&self) -> Status {
        match self {
            Status::Registered | Status::Other(_) => Status::Cancelled,
            Status::Attended => Status::Registered,
            Status::Cancelled => Status::Attended,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl Status {
    fn from_label(label: &str) -> Status {
        match label {
            "Registered" => Status::Registered,
            "Attended" => Status::Attended,
            "Cancelled" => Status::Cancelled,
            other => Status::Other(other.to_string()),
        }
    }
}

/// Any JSON value is accepted so one odd record cannot reject a whole list
/// Non-string values are kept as their JSON text.
impl From<Option<serde_json::Value>> for Status {
    fn from(value: Option<serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::String(s)) => Status::from_label(&s),
            Some(serde_json::Value::Null) | None => Status::Other(String::new()),
            Some(other) => Status::Other(other.to_string()),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Status::from_label(s))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single event registration as stored by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Assigned by the server, absent until the record is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RegistrationId>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub category: String,
    /// ISO calendar date, kept verbatim
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: Status,
}

impl Registration {
    /// Create a record that has not been sent to the server yet
    pub fn new(
        event_name: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
        status: Status,
    ) -> Self {
        Registration {
            id: None,
            event_name: event_name.into(),
            category: category.into(),
            date: date.into(),
            status,
        }
    }

    /// Same record with a server-assigned id
    pub fn with_id(mut self, id: impl Into<RegistrationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Copy of this record without its id, as sent in create and update bodies
    pub fn without_id(&self) -> Self {
        Registration {
            id: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_numeric_id() {
        let json = r#"{"id":7,"eventName":"RustConf","category":"Conference","date":"2024-09-10","status":"Attended"}"#;
        let reg: Registration = serde_json::from_str(json).unwrap();

        assert_eq!(reg.id, Some(RegistrationId::Number(7)));
        assert_eq!(reg.event_name, "RustConf");
        assert_eq!(reg.category, "Conference");
        assert_eq!(reg.date, "2024-09-10");
        assert_eq!(reg.status, Status::Attended);
    }

    #[test]
    fn test_string_id_is_kept_as_text() {
        let json = r#"{"id":"a1b2","eventName":"Meetup","category":"Social","date":"2024-01-02","status":"Registered"}"#;
        let reg: Registration = serde_json::from_str(json).unwrap();
        assert_eq!(reg.id, Some(RegistrationId::Text("a1b2".to_string())));

        let back = serde_json::to_value(&reg).unwrap();
        assert_eq!(back["id"], serde_json::json!("a1b2"));
    }

    #[test]
    fn test_missing_and_unknown_status() {
        let missing: Registration =
            serde_json::from_str(r#"{"id":1,"eventName":"A","category":"B","date":"2024-01-01"}"#)
                .unwrap();
        assert_eq!(missing.status, Status::Other(String::new()));

        let null: Registration = serde_json::from_str(
            r#"{"id":1,"eventName":"A","category":"B","date":"2024-01-01","status":null}"#,
        )
        .unwrap();
        assert_eq!(null.status, Status::Other(String::new()));

        let unknown: Registration = serde_json::from_str(
            r#"{"id":1,"eventName":"A","category":"B","date":"2024-01-01","status":"Waitlisted"}"#,
        )
        .unwrap();
        assert_eq!(unknown.status, Status::Other("Waitlisted".to_string()));
        assert_eq!(unknown.status.label(), "Waitlisted");
    }

    #[test]
    fn test_non_string_status_does_not_reject_list() {
        let json = r#"[
            {"id":1,"eventName":"A","category":"B","date":"2024-01-01","status":"Attended"},
            {"id":2,"eventName":"C","category":"D","date":"2024-01-02","status":1},
            {"id":3,"eventName":"E","category":"F","date":"2024-01-03","status":true}
        ]"#;
        let regs: Vec<Registration> = serde_json::from_str(json).unwrap();

        assert_eq!(regs.len(), 3);
        assert_eq!(regs[0].status, Status::Attended);
        assert_eq!(regs[1].status, Status::Other("1".to_string()));
        assert_eq!(regs[2].status, Status::Other("true".to_string()));
    }

    #[test]
    fn test_new_record_serializes_without_id() {
        let reg = Registration::new("Demo", "Workshop", "2024-05-01", Status::Registered);
        let value = serde_json::to_value(&reg).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(
            value,
            serde_json::json!({
                "eventName": "Demo",
                "category": "Workshop",
                "date": "2024-05-01",
                "status": "Registered"
            })
        );
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(Status::Registered.next(), Status::Attended);
        assert_eq!(Status::Attended.next(), Status::Cancelled);
        assert_eq!(Status::Cancelled.next(), Status::Registered);
        assert_eq!(Status::Other("x".into()).next(), Status::Registered);
        assert_eq!(Status::Registered.previous(), Status::Cancelled);
        assert_eq!(Status::Cancelled.previous(), Status::Attended);
    }

    #[test]
    fn test_id_from_str() {
        assert_eq!(RegistrationId::from("42"), RegistrationId::Number(42));
        assert_eq!(
            RegistrationId::from("abc"),
            RegistrationId::Text("abc".to_string())
        );
        assert_eq!(RegistrationId::Number(42).to_string(), "42");
    }
}
