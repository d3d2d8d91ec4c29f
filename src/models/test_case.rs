use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Paso de un caso de prueba: acción, datos de entrada y resultado esperado
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TestStep {
    #[serde(default, deserialize_with = "lenient_string")]
    pub step: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub result: String,
}

/// Caso de prueba generado a partir de una historia
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TestCase {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_steps",
        skip_serializing_if = "Option::is_none"
    )]
    pub steps: Option<Vec<TestStep>>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            steps: None,
        }
    }

    pub fn steps(&self) -> &[TestStep] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// Convierte un elemento cualquiera del arreglo del modelo en un caso.
    ///
    /// Un elemento que no es objeto se usa entero como descripción.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            Value::String(description) => Self::new(String::new(), description),
            other => Self::new(String::new(), other.to_string()),
        }
    }
}

impl TestStep {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            Value::String(step) => Self {
                step,
                ..Self::default()
            },
            other => Self {
                step: other.to_string(),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
impl TestCase {
    pub fn with_steps(mut self, steps: Vec<TestStep>) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// Acepta texto, números o null donde se espera texto; el modelo no siempre respeta el tipo
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Igual que `lenient_string`, pero conserva la ausencia del valor
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// `steps` que no sea un arreglo se descarta; los pasos en texto se aceptan
fn lenient_steps<'de, D>(deserializer: D) -> Result<Option<Vec<TestStep>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().map(TestStep::from_value).collect()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_text() {
        let tc: TestCase = serde_json::from_str(r#"{"id": 7, "description": "Logout"}"#).unwrap();
        assert_eq!(tc.id, "7");
        assert_eq!(tc.description, "Logout");
        assert!(tc.steps().is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let tc: TestCase = serde_json::from_str(r#"{"title": "unexpected"}"#).unwrap();
        assert_eq!(tc, TestCase::default());
    }

    #[test]
    fn reads_nested_steps() {
        let tc: TestCase = serde_json::from_str(
            r#"{"id":"TC-1","description":"Login","steps":[{"step":"Open page","data":null,"result":"Form shown"}]}"#,
        )
        .unwrap();
        assert_eq!(
            tc.steps(),
            &[TestStep {
                step: "Open page".into(),
                data: String::new(),
                result: "Form shown".into(),
            }]
        );
    }

    #[test]
    fn text_steps_become_actions() {
        let tc: TestCase =
            serde_json::from_str(r#"{"id":"TC-1","steps":["Open page", 2]}"#).unwrap();
        let steps = tc.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].step, "Open page");
        assert_eq!(steps[0].result, "");
        assert_eq!(steps[1].step, "2");
    }

    #[test]
    fn non_array_steps_are_dropped() {
        let tc: TestCase = serde_json::from_str(r#"{"id":"TC-1","steps":"n/a"}"#).unwrap();
        assert_eq!(tc.steps, None);
    }

    #[test]
    fn non_object_elements_become_descriptions() {
        assert_eq!(
            TestCase::from_value(Value::String("Login works".into())),
            TestCase::new("", "Login works")
        );
        assert_eq!(TestCase::from_value(serde_json::json!(42)).description, "42");
    }

    #[test]
    fn steps_are_omitted_when_absent() {
        let json = serde_json::to_value(TestCase::new("TC-1", "Login works")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "TC-1", "description": "Login works"}));
    }
}
