mod count;
mod engine;
mod predicate;
mod scanner;

pub use count::CountReconciler;
pub use engine::{CatalogSearchEngine, FavoritesMode, SearchRequest, SearchSettings, TrackPage};
pub use predicate::{Clause, TrackField, TrackFilter, TrackPredicate};
pub use scanner::{PagingStrategy, TokenPaginatedScanner};
