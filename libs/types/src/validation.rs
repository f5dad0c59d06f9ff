//! Validation finding taxonomy
//!
//! A [`ValidationError`] is a business finding about a record's content, not a
//! Rust error: it never aborts processing. Every rule appends findings to the
//! [`ValidationResult`] of the record it is evaluating.

use std::fmt;

/// Urgency axis for findings, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Number of severity levels
    pub const COUNT: usize = 3;

    /// Every level in ordinal order
    pub const ALL: [Severity; Self::COUNT] = [Severity::Low, Severity::Medium, Severity::High];

    /// Ordinal used to index fixed-size aggregate tables
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification axis for findings.
///
/// `Mandatory` is reserved: no current rule emits it, but reports always list it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Mandatory,
    Schema,
    Financial,
    Business,
    Security,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 5;

    /// Every category in report order
    pub const ALL: [Category; Self::COUNT] = [
        Category::Mandatory,
        Category::Schema,
        Category::Financial,
        Category::Business,
        Category::Security,
    ];

    /// Ordinal used to index fixed-size aggregate tables
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Mandatory => "MANDATORY",
            Category::Schema => "SCHEMA",
            Category::Financial => "FINANCIAL",
            Category::Business => "BUSINESS",
            Category::Security => "SECURITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based ordinal of a top-level object in the input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordPosition(u64);

impl RecordPosition {
    pub const fn new(ordinal: u64) -> Self {
        Self(ordinal)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One categorized, severity-tagged finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
    severity: Severity,
    category: Category,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, severity: Severity, category: Category) -> Self {
        Self {
            message: message.into(),
            severity,
            category,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.category, self.severity, self.message)
    }
}

/// Ordered findings for a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    position: RecordPosition,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(position: RecordPosition) -> Self {
        Self {
            position,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Shorthand for `push(ValidationError::new(..))`
    pub fn add(&mut self, message: impl Into<String>, severity: Severity, category: Category) {
        self.push(ValidationError::new(message, severity, category));
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn position(&self) -> RecordPosition {
        self.position
    }

    /// Findings in one category, in emission order
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.category == category)
    }
}

/// A finding as stored in a category bucket of the run context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub order_id: String,
    pub position: RecordPosition,
    pub error: ValidationError,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Record {} ({}) [{}]: {}",
            self.position,
            self.order_id,
            self.error.severity(),
            self.error.message()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_all_tables() {
        for (i, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.index(), i);
        }
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert!(Severity::High > Severity::Medium);
    }

    #[test]
    fn test_result_tracks_errors() {
        let mut result = ValidationResult::new(RecordPosition::new(3));
        assert!(!result.has_errors());

        result.add("Missing currency", Severity::High, Category::Schema);
        result.add("High Risk Currency detected: BTC", Severity::High, Category::Security);

        assert!(result.has_errors());
        assert_eq!(result.position().get(), 3);
        assert_eq!(result.in_category(Category::Security).count(), 1);
        assert_eq!(result.in_category(Category::Mandatory).count(), 0);
    }

    #[test]
    fn test_display_formats() {
        let error = ValidationError::new("Missing order_id", Severity::High, Category::Schema);
        assert_eq!(error.to_string(), "[SCHEMA] [HIGH] Missing order_id");

        let failure = ValidationFailure {
            order_id: "N/A".to_string(),
            position: RecordPosition::new(12),
            error,
        };
        assert_eq!(failure.to_string(), "Record 12 (N/A) [HIGH]: Missing order_id");
    }
}
