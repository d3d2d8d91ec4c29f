use serde_json::Value;

/// Nodos de bloque después de los cuales se inserta un salto de línea
const TEXT_BLOCKS: &[&str] = &["paragraph", "heading", "codeBlock"];

/// Convierte una descripción de Jira a texto plano.
///
/// Acepta tanto documentos ADF (API v3) como texto plano (API v2). En ADF se
/// concatenan los fragmentos de texto de cada bloque y se añade un salto de
/// línea al final de cada bloque de texto.
pub fn adf_to_plain_text(description: &Value) -> String {
    let mut out = String::new();
    match description {
        Value::String(text) => out.push_str(text),
        Value::Object(_) => collect_text(description, &mut out),
        _ => {}
    }
    out.trim_end().to_string()
}

fn collect_text(node: &Value, out: &mut String) {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();

    match node_type {
        "text" => {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        "hardBreak" => out.push('\n'),
        _ => {}
    }

    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }

    if TEXT_BLOCKS.contains(&node_type) {
        out.push('\n');
    }
}
