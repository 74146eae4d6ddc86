use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parses `asc`/`desc` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A single sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self { property: property.into(), direction: Direction::Asc }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self { property: property.into(), direction: Direction::Desc }
    }
}

/// Request for one slice of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    /// Zero-based page index.
    pub page: u32,
    /// Page size, always at least 1.
    pub size: u32,
    pub sort: Vec<Order>,
}

impl Pageable {
    pub fn of(page: u32, size: u32) -> Self {
        Self { page, size: size.max(1), sort: Vec::new() }
    }

    pub fn with_sort(mut self, sort: Vec<Order>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// Rejects sort properties the entity does not expose.
    pub fn validate_for<E: Entity>(&self) -> CoreResult<()> {
        match self.sort.iter().find(|order| !E::is_sortable(&order.property)) {
            Some(order) => Err(CoreError::ValidationError(format!(
                "Unknown sort property '{}' for {}",
                order.property,
                E::NAME
            ))),
            None => Ok(()),
        }
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self::of(0, 20)
    }
}

/// One slice of a collection plus the metadata needed for pagination links.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    pub content: Vec<E>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<E> Page<E> {
    pub fn new(content: Vec<E>, pageable: &Pageable, total_elements: u64) -> Self {
        Self {
            content,
            number: pageable.page,
            size: pageable.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total_elements.div_ceil(self.size as u64)
    }

    pub fn has_next(&self) -> bool {
        (self.number as u64) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn into_content(self) -> Vec<E> {
        self.content
    }
}
