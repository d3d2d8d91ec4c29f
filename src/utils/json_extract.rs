use log::warn;
use serde_json::Value;

use crate::models::TestCase;

/// Extrae el arreglo JSON de casos de prueba del texto libre que devuelve el modelo.
///
/// Toma desde el primer `[` hasta el último `]`. Si no hay corchetes o el
/// contenido no es JSON válido, devuelve una lista vacía. Cada elemento se
/// convierte sin exigir la forma de un caso.
pub fn extract_test_cases(text: &str) -> Vec<TestCase> {
    let (start, end) = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            warn!("La respuesta del modelo no contiene un arreglo JSON");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Value>>(&text[start..=end]) {
        Ok(items) => items.into_iter().map(TestCase::from_value).collect(),
        Err(e) => {
            warn!("No se pudo interpretar el arreglo JSON del modelo: {}", e);
            Vec::new()
        }
    }
}
