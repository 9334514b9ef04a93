use crate::error::{DomainError, ValidationErrors};

/// Limits applied to list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
        }
    }
}

/// Offset/limit window over a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: usize,
    pub offset: usize,
}

impl PageParams {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Fill in defaults and check bounds.
    pub fn resolve(
        limit: Option<usize>,
        offset: Option<usize>,
        policy: &PagePolicy,
    ) -> Result<Self, DomainError> {
        let limit = limit.unwrap_or(policy.default_limit);
        let mut errors = ValidationErrors::new();
        if limit == 0 || limit > policy.max_limit {
            errors.push(
                "limit",
                format!("limit must be between 1 and {}", policy.max_limit),
            );
        }
        errors.into_result()?;

        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Cut this window out of an already ordered list. `total` is the length
    /// of the whole list.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        Page { items, total }
    }
}

/// One window of a list plus the size of the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}
