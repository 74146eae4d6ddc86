use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tusk_shared::{Deal, Passenger};

/// A record whose identity is assigned by the persistence layer on first save.
///
/// Everything apart from the id is opaque payload: the REST adapter and the
/// stores only ever look at it through serde.
pub trait Entity: Serialize + DeserializeOwned + Debug + Clone + Send + Sync + 'static {
    /// Topic used in alert headers, e.g. `"deal"`.
    const NAME: &'static str;
    /// Plural path segment and table name, e.g. `"deals"`.
    const COLLECTION: &'static str;
    /// JSON fields clients may sort by.
    const SORTABLE_FIELDS: &'static [&'static str];

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);

    fn is_sortable(property: &str) -> bool {
        Self::SORTABLE_FIELDS.contains(&property)
    }
}

impl Entity for Deal {
    const NAME: &'static str = "deal";
    const COLLECTION: &'static str = "deals";
    const SORTABLE_FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "destination",
        "price_nuc",
        "currency",
        "valid_until",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Entity for Passenger {
    const NAME: &'static str = "passenger";
    const COLLECTION: &'static str = "passengers";
    // passport_number is never a sort key.
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["id", "first_name", "last_name", "email", "date_of_birth"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
