//! REST API: JSON endpoints, legacy endpoints and page contexts

pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
