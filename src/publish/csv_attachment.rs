use log::info;

use crate::clients::AttachmentSink;
use crate::error::Result;
use crate::models::TestCase;
use crate::utils::to_csv_bytes;

pub fn attachment_name(story_id: &str) -> String {
    format!("test_cases_{}.csv", story_id)
}

/// Sube los casos como adjunto CSV de la historia.
///
/// Devuelve `Ok(false)` si el gestor rechazó la subida.
pub fn publish_csv(
    sink: &dyn AttachmentSink,
    story_id: &str,
    test_cases: &[TestCase],
) -> Result<bool> {
    let bytes = to_csv_bytes(test_cases)?;
    let file_name = attachment_name(story_id);
    info!(
        "Publicando {} casos en {} como {}",
        test_cases.len(),
        story_id,
        file_name
    );
    sink.upload_attachment(story_id, &file_name, bytes)
}
