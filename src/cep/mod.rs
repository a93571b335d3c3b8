//! Postal code (CEP) handling.
//!
//! # Responsibilities
//! - Shape validation of inbound postal codes
//! - Normalization of provider-supplied city names for query strings
//!
//! # Design Decisions
//! - Postal codes are validated, never reformatted
//! - Two shape rules coexist; each hop picks its own through configuration
//! - Everything here is pure: no I/O, no spans

pub mod normalizer;
pub mod validator;

pub use normalizer::normalize_city_name;
pub use validator::{PostalCode, PostalCodeShape, POSTAL_CODE_LEN};
