//! Maps `Box<dyn Error>` from collaborator boundaries to a typed `DoseError`.
//!
//! The traits in `bolus_traits` return boxed errors so that a CGM client or a
//! model runtime can report whatever it likes. A collaborator that already
//! speaks `DoseError` keeps its kind; anything else becomes `DoseError::Source`.

use crate::error::DoseError;

/// Map a trait-boundary error to a typed `DoseError`.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> DoseError {
    if let Some(de) = e.downcast_ref::<DoseError>() {
        return de.clone();
    }
    DoseError::Source(e.to_string())
}
