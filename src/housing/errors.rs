use thiserror::Error;

/// Errors raised by the housing engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HousingError {
    /// No metadata has been imported yet.
    #[error("housing metadata not found")]
    MissingMetadata,

    /// The inventory lacks a record that metadata declares. Run inventory sync first.
    #[error("inventory has no {kind} record for '{name}'")]
    IncompleteInventory { kind: &'static str, name: String },

    /// A name that metadata does not know about.
    #[error("unknown {kind}: '{name}'")]
    UnknownItem { kind: &'static str, name: String },

    /// A record change or loaded record that breaks an inventory invariant.
    #[error("invalid inventory record: {0}")]
    InvalidRecord(String),

    /// A quantity or price too large to total.
    #[error("total for '{0}' overflows")]
    Overflow(String),
}

impl HousingError {
    pub(crate) fn incomplete(kind: &'static str, name: &str) -> Self {
        HousingError::IncompleteInventory {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn overflow(name: &str) -> Self {
        HousingError::Overflow(name.to_string())
    }

    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        HousingError::UnknownItem {
            kind,
            name: name.to_string(),
        }
    }
}

pub type HousingResult<T> = Result<T, HousingError>;
