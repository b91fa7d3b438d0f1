//! Validation trait definition

/// Validation of one configuration section
pub trait Validate {
    /// Return a human-readable description of the first problem found
    fn validate(&self) -> Result<(), String>;
}
