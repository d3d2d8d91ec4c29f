use log::{info, warn};

use crate::clients::TestManagement;
use crate::error::AppError;
use crate::models::{CaseOutcome, CaseStatus, TestCase};

/// Longitud máxima del nombre de un caso en Zephyr Scale
pub const MAX_NAME_LEN: usize = 255;

/// Interpreta el id numérico de la incidencia, que Jira entrega como texto
pub fn parse_issue_id(id: &str) -> Result<i64, AppError> {
    id.trim()
        .parse()
        .map_err(|_| AppError::InvalidIssueId(id.to_string()))
}

fn case_name(description: &str) -> String {
    description.chars().take(MAX_NAME_LEN).collect()
}

/// Crea un caso, le añade sus pasos uno a uno y lo vincula con la incidencia.
///
/// Los fallos de pasos se cuentan pero no cambian el estado; un caso solo
/// queda `Created` si la creación y la vinculación tienen éxito. No se
/// deshace nada ante un fallo parcial.
pub fn publish_case(
    api: &dyn TestManagement,
    project_key: &str,
    issue_id: &str,
    test_case: &TestCase,
) -> CaseOutcome {
    let key = match api.create_test_case(
        project_key,
        &case_name(&test_case.description),
        &test_case.description,
    ) {
        Ok(key) => key,
        Err(e) => {
            warn!("No se pudo crear el caso {}: {}", test_case.id, e);
            return CaseOutcome::failed(&test_case.id, e.to_string());
        }
    };

    let mut steps_added = 0;
    let mut steps_failed = 0;
    for (i, step) in test_case.steps().iter().enumerate() {
        match api.add_test_step(&key, step) {
            Ok(()) => steps_added += 1,
            Err(e) => {
                steps_failed += 1;
                warn!("Paso {} de {} no añadido: {}", i + 1, key, e);
            }
        }
    }

    let link = parse_issue_id(issue_id).and_then(|id| api.link_issue(&key, id));
    let (status, reason) = match link {
        Ok(()) => {
            info!("Caso {} creado y vinculado", key);
            (CaseStatus::Created, None)
        }
        Err(e) => {
            warn!("Caso {} creado pero sin vincular: {}", key, e);
            (CaseStatus::Unlinked, Some(e.to_string()))
        }
    };

    let total_steps = steps_added + steps_failed;
    let reason = reason.or_else(|| {
        (steps_failed > 0).then(|| format!("{} of {} steps failed", steps_failed, total_steps))
    });

    CaseOutcome {
        source_id: test_case.id.clone(),
        key: Some(key),
        status,
        steps_added,
        steps_failed,
        reason,
    }
}
