use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_attendance_code(code: &str) -> Result<(), ApiError> {
    let valid = code.len() == 4 && code.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Attendance code must be 4 digits".to_string()))
    }
}

pub(crate) fn validate_seat_number(seat_number: i32) -> Result<(), ApiError> {
    if seat_number >= 1 {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Seat number must be a positive integer".to_string()))
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    if !trimmed.is_empty() && trimmed.contains('@') {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email address".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}
