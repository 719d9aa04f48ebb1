use aeron_core::CategoryCode;
use thiserror::Error;

/// Problems with the embedded template catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog section is not valid JSON or does not match the option/step shape
    #[error("catalog for {category} is invalid: {source}")]
    Invalid {
        category: CategoryCode,
        #[source]
        source: serde_json::Error,
    },

    /// A catalog section parsed but cannot produce a usable result
    #[error("catalog for {category} is incomplete: {reason}")]
    Incomplete { category: CategoryCode, reason: String },
}
