use std::fmt;

use super::ApiError;

pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::validation(
            "Invalid page: 0. Page must be a positive integer",
        ));
    }
    Ok(page)
}

pub fn validate_entry_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid entry ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

/// Turns an extractor rejection into a 400 carrying the rejection text.
pub fn extracted<T, E: fmt::Display>(result: Result<T, E>) -> Result<T, ApiError> {
    result.map_err(|e| ApiError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1).is_ok());
        assert!(validate_page(500).is_ok());
        assert!(validate_page(0).is_err());
    }

    #[test]
    fn test_validate_entry_id() {
        assert!(validate_entry_id(1).is_ok());
        assert!(validate_entry_id(0).is_err());
        assert!(validate_entry_id(-3).is_err());
    }

    #[test]
    fn test_extracted_maps_to_validation() {
        let err = extracted::<(), _>(Err("bad query")).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(msg) if msg == "bad query"));
    }
}
