use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{Reader, Writer};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TestCase;

pub const DEFINITIONS_DIR: &str = "definitions";

/// Fila del CSV de casos de prueba; los pasos no se exportan
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Description")]
    description: String,
}

fn write_rows<W: io::Write>(writer: &mut Writer<W>, test_cases: &[TestCase]) -> Result<()> {
    // Con una lista vacía serialize() no llega a escribir la cabecera
    writer.write_record(["ID", "Description"])?;
    for test_case in test_cases {
        writer.write_record([test_case.id.as_str(), test_case.description.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Serializa los casos de prueba en CSV con cabecera `ID,Description`
pub fn to_csv_bytes(test_cases: &[TestCase]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    write_rows(&mut writer, test_cases)?;
    writer
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()).into())
}

/// Guarda casos de prueba en un archivo CSV
pub fn save_to_csv(file_path: impl AsRef<Path>, test_cases: &[TestCase]) -> Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);
    write_rows(&mut writer, test_cases)
}

/// Carga casos de prueba desde un archivo CSV
pub fn load_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let file = File::open(file_path.as_ref())?;
    let mut reader = Reader::from_reader(file);

    let mut test_cases = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => test_cases.push(TestCase::new(row.id, row.description)),
            Err(e) => warn!("Error al leer caso de prueba: {}", e),
        }
    }

    Ok(test_cases)
}

/// Obtiene la lista de archivos de definición disponibles
pub fn get_definition_files() -> io::Result<Vec<String>> {
    let mut files = Vec::new();

    if !Path::new(DEFINITIONS_DIR).exists() {
        return Ok(files);
    }

    for entry in fs::read_dir(DEFINITIONS_DIR)? {
        let path = entry?.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "csv") {
            if let Some(path_str) = path.to_str() {
                files.push(path_str.to_string());
            }
        }
    }

    // Más recientes primero
    files.sort_by(|a, b| b.cmp(a));

    Ok(files)
}
