use serde_json::{Map, Value};

use crate::models::{ClientInfo, ProjectRecord};

pub type Fields = Map<String, Value>;

/// Text value of a field, `""` when missing.
///
/// Lookup fields arrive as arrays and collaborator fields as objects, so both
/// are flattened to their display text.
pub fn text(fields: &Fields, name: &str) -> String {
    fields.get(name).map(value_text).unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj) => obj
            .get("name")
            .or_else(|| obj.get("email"))
            .map(value_text)
            .unwrap_or_default(),
    }
}

/// Truthiness of a field, `false` when missing
pub fn flag(fields: &Fields, name: &str) -> bool {
    match fields.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(obj)) => !obj.is_empty(),
    }
}

/// URL of the first attachment in an attachment field
pub fn first_attachment_url(fields: &Fields, name: &str) -> Option<String> {
    fields
        .get(name)?
        .as_array()?
        .first()?
        .get("url")?
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

pub fn project_from_fields(fields: &Fields) -> ProjectRecord {
    ProjectRecord {
        job_number: text(fields, "Job Number"),
        job_name: text(fields, "Project Name"),
        description: text(fields, "Description"),
        stage: text(fields, "Stage"),
        status: text(fields, "Status"),
        with_client: flag(fields, "With Client?"),
        latest_update: text(fields, "Latest Update"),
        update_due: text(fields, "Update Due"),
        live_date: text(fields, "Live Date"),
        client: text(fields, "Client"),
        project_owner: text(fields, "Project Owner"),
        status_changed: text(fields, "Status Changed"),
    }
}

pub fn client_from_fields(fields: &Fields) -> ClientInfo {
    ClientInfo {
        client_name: text(fields, "Client"),
        client_code: text(fields, "Client code"),
        header_image_url: first_attachment_url(fields, "Wip headers"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn maps_project_fields_with_defaults() {
        let record = project_from_fields(&fields(json!({
            "Job Number": "ONE-101",
            "Project Name": "Spring campaign",
            "Status": "In Progress",
            "With Client?": true,
            "Live Date": "TBC",
            "Project Owner": {"id": "usr1", "email": "sam@example.com", "name": "Sam"},
            "Client": ["One NZ"],
        })));

        assert_eq!(record.job_number, "ONE-101");
        assert_eq!(record.job_name, "Spring campaign");
        assert!(record.with_client);
        assert_eq!(record.live_date, "TBC");
        assert_eq!(record.project_owner, "Sam");
        assert_eq!(record.client, "One NZ");
        assert_eq!(record.description, "");
        assert_eq!(record.update_due, "");
    }

    #[test]
    fn missing_flag_is_false() {
        let record = project_from_fields(&fields(json!({"Status": "On Hold"})));
        assert!(!record.with_client);
    }

    #[test]
    fn flag_follows_truthiness() {
        let f = fields(json!({"a": "yes", "b": "", "c": 0, "d": [1], "e": null}));
        assert!(flag(&f, "a"));
        assert!(!flag(&f, "b"));
        assert!(!flag(&f, "c"));
        assert!(flag(&f, "d"));
        assert!(!flag(&f, "e"));
    }

    #[test]
    fn client_header_is_first_attachment() {
        let client = client_from_fields(&fields(json!({
            "Client": "One NZ",
            "Client code": "ONE",
            "Wip headers": [
                {"url": "https://cdn.example.com/one.png"},
                {"url": "https://cdn.example.com/two.png"}
            ],
        })));
        assert_eq!(client.client_name, "One NZ");
        assert_eq!(
            client.header_image_url.as_deref(),
            Some("https://cdn.example.com/one.png")
        );
    }

    #[test]
    fn client_without_header_has_none() {
        let client = client_from_fields(&fields(json!({"Client": "One NZ", "Wip headers": []})));
        assert_eq!(client.header_image_url, None);
    }
}
