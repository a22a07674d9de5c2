//! Asignación de identificadores públicos
//!
//! Genera los tokens cortos (`public_id`) que identifican a un vehículo de
//! cara al exterior. El token se deriva de un UUID v4 (128 bits aleatorios)
//! truncado a 8 caracteres hex en minúscula, y se re-genera mientras el
//! store reporte el candidato como ocupado. Con un espacio de 16^8 valores
//! frente a miles de registros, el número esperado de reintentos es ~1.

use async_trait::async_trait;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Longitud del token público
pub const PUBLIC_ID_LEN: usize = 8;

/// Vista de solo lectura sobre los identificadores ya emitidos.
///
/// El allocator no escribe: persistir el registro bajo el id devuelto es
/// responsabilidad del caller. Si el store no está disponible el error se
/// propaga sin reintentos locales.
#[async_trait]
pub trait PublicIdIndex: Send + Sync {
    async fn public_id_exists(&self, public_id: &str) -> Result<bool, AppError>;
}

/// Generar un `public_id` candidato
fn generate_candidate() -> String {
    let mut candidate = Uuid::new_v4().simple().to_string();
    candidate.truncate(PUBLIC_ID_LEN);
    candidate
}

/// Obtener un `public_id` fresco, garantizado como no emitido en el momento
/// de la consulta. La constraint UNIQUE de la base de datos cubre la ventana
/// entre esta consulta y el INSERT.
pub async fn allocate_public_id<S>(store: &S) -> Result<String, AppError>
where
    S: PublicIdIndex + ?Sized,
{
    loop {
        let candidate = generate_candidate();
        if !store.public_id_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!("public_id '{}' ya emitido, generando otro", candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct InMemoryIndex {
        issued: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl PublicIdIndex for InMemoryIndex {
        async fn public_id_exists(&self, public_id: &str) -> Result<bool, AppError> {
            Ok(self.issued.lock().await.contains(public_id))
        }
    }

    /// Store que reporta ocupados los primeros N candidatos consultados
    struct CollidingIndex {
        remaining_collisions: AtomicUsize,
    }

    #[async_trait]
    impl PublicIdIndex for CollidingIndex {
        async fn public_id_exists(&self, _public_id: &str) -> Result<bool, AppError> {
            let previous = self
                .remaining_collisions
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .unwrap_or(0);
            Ok(previous > 0)
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl PublicIdIndex for FailingIndex {
        async fn public_id_exists(&self, _public_id: &str) -> Result<bool, AppError> {
            Err(AppError::Internal("store no disponible".to_string()))
        }
    }

    #[tokio::test]
    async fn test_allocate_format() {
        let store = InMemoryIndex {
            issued: Mutex::new(HashSet::new()),
        };

        let id = allocate_public_id(&store).await.unwrap();
        assert_eq!(id.len(), PUBLIC_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, id.to_lowercase());
    }

    #[tokio::test]
    async fn test_allocate_unique_against_issued_set() {
        let store = InMemoryIndex {
            issued: Mutex::new(HashSet::new()),
        };

        for _ in 0..100 {
            let id = allocate_public_id(&store).await.unwrap();
            let mut issued = store.issued.lock().await;
            assert!(issued.insert(id), "id repetido");
        }
    }

    #[tokio::test]
    async fn test_allocate_retries_on_collision() {
        let store = CollidingIndex {
            remaining_collisions: AtomicUsize::new(3),
        };

        let id = allocate_public_id(&store).await.unwrap();
        assert_eq!(id.len(), PUBLIC_ID_LEN);
        // Los tres primeros candidatos colisionaron; el cuarto salió
        assert_eq!(store.remaining_collisions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allocate_propagates_store_failure() {
        assert!(allocate_public_id(&FailingIndex).await.is_err());
    }
}
