//! Product and user payloads exchanged with the backend, plus the local
//! filtering and ranking used by the catalog pages.

mod domain;
mod fixture;
mod listing;

pub use domain::{
    AiScoreSummary, ApprovalCheckResponse, ApprovalFactorWeight, Product, ProductType,
    ProfilePatch, SearchParams, SearchResponse, UserProfile,
};
pub use fixture::fixture_products;
pub use listing::{filter_by_type, search_products, sort_by_ai_score, top_products};

/// Number of products on the home page leaderboard.
pub const TOP_LIMIT: usize = 10;
