pub mod snapshot;
pub mod tabular;

pub use snapshot::{SnapshotError, load_forest, save_forest, snapshot_path};
pub use tabular::{TabularError, next_forest, tabular_path};
