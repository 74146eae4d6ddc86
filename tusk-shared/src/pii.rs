use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps personal data so it never shows up in `Debug`/`Display` output.
///
/// Serialization is transparent: API responses and the JSONB payloads written
/// by the stores carry the real value. Only log macros such as
/// `tracing::debug!("{:?}", passenger)` see the mask.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
