//! OpenSearch index mappings.
//!
//! This module defines the default mapping for the movie catalogue index used
//! by autocomplete.

use search_gateway_shared::{FieldMapping, Mapping};

/// Default name of the catalogue index.
pub const DEFAULT_INDEX_NAME: &str = "movies";

/// Get the default mapping for the catalogue index.
///
/// The configuration includes:
/// - **completion**: `title` and `phase`, analysed with `simple`, feed the
///   autocomplete suggesters
/// - **keyword**: `category_name`, `rating_name` and `budget` are kept
///   verbatim so values like `000` are never tokenized
/// - **date**: `release_year` as a bare year and `release_date` as
///   `MMM dd, yyyy`, both also accepting epoch milliseconds
pub fn default_mapping() -> Mapping {
    Mapping::new()
        .field("title", FieldMapping::completion("simple"))
        .field("phase", FieldMapping::completion("simple"))
        .field("category_name", FieldMapping::keyword())
        .field("rating_name", FieldMapping::keyword())
        .field("budget", FieldMapping::keyword())
        .field("release_year", FieldMapping::date("yyyy||epoch_millis"))
        .field("release_date", FieldMapping::date("MMM dd, yyyy||epoch_millis"))
}
