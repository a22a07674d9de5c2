//! Registro de escaneos de QR
//!
//! Cada vista de la página pública de un vehículo emite un evento de
//! escaneo. Los eventos se encolan en un canal y una tarea en background
//! los va anexando a un CSV, así la latencia del request no depende del
//! I/O de archivo y dos escaneos concurrentes no compiten por el archivo.
//! Un fallo del sink se loguea y nada más: nunca bloquea ni tumba la vista.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

const CSV_HEADER: &str = "Date & Time,Car Number,Owner Name,Unit Number\n";

/// Evento de escaneo de un QR
#[derive(Debug)]
pub struct ScanEvent {
    pub car_number: String,
    pub owner_name: String,
    pub unit_number: String,
    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    pub fn now(car_number: String, owner_name: String, unit_number: String) -> Self {
        Self {
            car_number,
            owner_name,
            unit_number,
            scanned_at: Utc::now(),
        }
    }
}

/// Handle clonable hacia el sink de escaneos
#[derive(Clone)]
pub struct ScanLog {
    tx: mpsc::UnboundedSender<ScanEvent>,
}

impl ScanLog {
    /// Arrancar la tarea de escritura y devolver el handle para encolar
    /// eventos desde los handlers.
    pub fn start(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ScanEvent>();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = append_event(&path, &event).await {
                    tracing::warn!(
                        "No se pudo registrar el escaneo de '{}' en {}: {}",
                        event.car_number,
                        path.display(),
                        e
                    );
                } else {
                    tracing::info!("Escaneo registrado: {}", event.car_number);
                }
            }
        });

        Self { tx }
    }

    /// Encolar un evento. Fire-and-forget: si la tarea de escritura ya no
    /// está, solo se deja un warning.
    pub fn record(&self, event: ScanEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Sink de escaneos cerrado, evento descartado");
        }
    }
}

/// Anexar un evento al CSV, escribiendo la cabecera si el archivo es nuevo
async fn append_event(path: &Path, event: &ScanEvent) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    if file.metadata().await?.len() == 0 {
        file.write_all(CSV_HEADER.as_bytes()).await?;
    }

    let line = format!(
        "{},{},{},{}\n",
        event.scanned_at.format("%Y-%m-%d %H:%M:%S"),
        csv_field(&event.car_number),
        csv_field(&event.owner_name),
        csv_field(&event.unit_number),
    );
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

/// Escapar un campo CSV si contiene coma, comilla o salto de línea
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_log_path() -> PathBuf {
        std::env::temp_dir().join(format!("qcar-scan-log-{}.csv", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_append_creates_header_once() {
        let path = temp_log_path();

        append_event(
            &path,
            &ScanEvent::now("ABC-123".into(), "J. Smith".into(), "12A".into()),
        )
        .await
        .unwrap();
        append_event(
            &path,
            &ScanEvent::now("XYZ-999".into(), "M. García".into(), "3B".into()),
        )
        .await
        .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.trim_end());
        assert!(lines[1].contains("ABC-123"));
        assert!(lines[2].contains("XYZ-999"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("ABC-123"), "ABC-123");
        assert_eq!(csv_field("Smith, John"), "\"Smith, John\"");
        assert_eq!(csv_field("el \"jefe\""), "\"el \"\"jefe\"\"\"");
    }
}
