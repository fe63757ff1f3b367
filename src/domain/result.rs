//! Result type alias for sumo-export

use super::errors::SumoError;

/// Result type alias for sumo-export operations
///
/// # Examples
///
/// ```
/// use sumo_export::domain::result::Result;
/// use sumo_export::domain::errors::SumoError;
///
/// fn failing_function() -> Result<()> {
///     Err(SumoError::InvalidInput("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SumoError>;
