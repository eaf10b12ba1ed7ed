use stormwatch_core::{AppError, StorageError};
use stormwatch_services::StorageError as StoreError;

pub fn storage_error(e: StoreError) -> AppError {
    let detail = e.to_string();
    AppError::Storage(match e {
        StoreError::Read { .. } => StorageError::ReadFailed(detail),
        StoreError::Write { .. } => StorageError::WriteFailed(detail),
        StoreError::Malformed { .. } => StorageError::Malformed(detail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_maps_to_write_failed() {
        let err = storage_error(StoreError::write("favorites", "disk full"));
        assert!(matches!(err, AppError::Storage(StorageError::WriteFailed(_))));
        assert!(err.to_string().contains("disk full"));
    }
}
