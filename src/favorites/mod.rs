mod index;
mod store;

pub use index::{AddFavoriteOutcome, FavoritesIndex};
pub use store::FavoritesStore;
