use crate::forest::Forest;

/// Aggregate metrics over the current trees of a forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestStatistics {
    pub tree_count: usize,
    pub total_height: f64,
    /// `None` for an empty forest.
    pub average_height: Option<f64>,
}

/// Compute statistics for a forest without dividing by zero.
pub fn compute_statistics(forest: &Forest) -> ForestStatistics {
    let total_height: f64 = forest.trees().iter().map(|tree| tree.height()).sum();

    let tree_count = forest.len();
    let average_height = if tree_count == 0 {
        None
    } else {
        Some(total_height / tree_count as f64)
    };

    ForestStatistics {
        tree_count,
        total_height,
        average_height,
    }
}
