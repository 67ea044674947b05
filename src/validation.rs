use crate::error::ApiError;
use crate::models::ClassTemplateInput;

/// Form-level checks run before any store call is issued.
pub fn validate_class_input(input: &ClassTemplateInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("class name must not be empty".into()));
    }
    if input.duration_min == 0 {
        return Err(ApiError::BadRequest(
            "duration must be a positive number of minutes".into(),
        ));
    }
    if input.capacity == 0 {
        return Err(ApiError::BadRequest("capacity must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, duration_min: u32, capacity: u32) -> ClassTemplateInput {
        ClassTemplateInput {
            name: name.into(),
            description: None,
            duration_min,
            capacity,
        }
    }

    #[test]
    fn test_validate_class_input() {
        assert!(validate_class_input(&input("HIIT", 45, 12)).is_ok());
        assert!(validate_class_input(&input("  ", 45, 12)).is_err());
        assert!(validate_class_input(&input("HIIT", 0, 12)).is_err());
        assert!(validate_class_input(&input("HIIT", 45, 0)).is_err());
    }
}
