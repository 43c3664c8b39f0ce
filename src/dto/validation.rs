//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest id the platform hands out (64-bit unsigned, in decimal).
const MAX_SNOWFLAKE_LEN: usize = 20;

/// Validates that a platform id is a non-empty decimal snowflake.
///
/// # Examples
///
/// ```ignore
/// validate_snowflake("175928847299117063") // Ok
/// validate_snowflake("")                   // Err - empty
/// validate_snowflake("12ab")               // Err - not numeric
/// ```
pub fn validate_snowflake(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_SNOWFLAKE_LEN {
        let mut err = ValidationError::new("snowflake_length");
        err.message = Some(
            format!(
                "Platform id must be 1 to {MAX_SNOWFLAKE_LEN} digits (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("snowflake_format");
        err.message = Some("Platform id must contain only decimal digits".into());
        return Err(err);
    }

    Ok(())
}
