pub mod statistics;
pub mod tree;

use std::fmt;
use std::fmt::Write as _;
use std::io::{self, Write};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use statistics::{ForestStatistics, compute_statistics};
pub use tree::{Species, Tree};

/// Errors raised by operations on a [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestError {
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ForestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForestError::IndexOutOfRange { index, len } => {
                write!(f, "Tree number {} does not exist (forest has {} trees)", index, len)
            }
        }
    }
}

impl std::error::Error for ForestError {}

/// A named, ordered collection of trees. Index order is planting order and
/// is what the console addresses trees by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    name: Option<String>,
    trees: Vec<Tree>,
}

impl Forest {
    /// An empty, unnamed forest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>, trees: Vec<Tree>) -> Self {
        Self {
            name: Some(name.into()),
            trees,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.trees.len()
    }

    pub fn get(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    pub fn add_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    pub fn add_random_tree<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.trees.push(Tree::random(rng));
    }

    /// Remove the tree at `index`, shifting later trees down by one.
    /// An out-of-range index leaves the forest unchanged.
    pub fn cut_tree_by_index(&mut self, index: usize) -> Result<Tree, ForestError> {
        if !self.contains_index(index) {
            return Err(ForestError::IndexOutOfRange {
                index,
                len: self.trees.len(),
            });
        }
        let tree = self.trees.remove(index);
        debug!(index, species = %tree.species(), "Cut tree");
        Ok(tree)
    }

    /// Advance every tree by one year of growth, in index order.
    pub fn simulate_tree_growth(&mut self) {
        for tree in &mut self.trees {
            tree.grow();
        }
        debug!(trees = self.trees.len(), "Simulated one year of growth");
    }

    /// Replace every tree at least `limit` feet tall with a new random tree.
    ///
    /// Single forward pass: a replacement is never checked against `limit`
    /// in the same call. Each replacement is reported to `out` as it happens.
    /// Returns the number of trees reaped.
    pub fn reap_forest<R, W>(&mut self, limit: f64, rng: &mut R, out: &mut W) -> io::Result<usize>
    where
        R: Rng + ?Sized,
        W: Write + ?Sized,
    {
        let mut reaped = 0;
        for (index, slot) in self.trees.iter_mut().enumerate() {
            if slot.height() < limit {
                continue;
            }
            writeln!(out, "Reaping the tall tree: {}", slot)?;
            let replacement = Tree::random(rng);
            debug!(index, old = %slot, new = %replacement, "Reaped tree");
            *slot = replacement;
            writeln!(out, "Replaced with a new tree: {}", slot)?;
            reaped += 1;
        }
        Ok(reaped)
    }

    /// Console report: name, one line per tree, count and average height.
    pub fn render(&self) -> String {
        let stats = compute_statistics(self);
        let mut report = String::new();

        let _ = writeln!(report, "Forest name: {}", self.name().unwrap_or("(unnamed)"));
        for (index, tree) in self.trees.iter().enumerate() {
            let _ = writeln!(
                report,
                "{:>5} {:<6} {:>4} {:>6.2}' {:>5.1}%",
                index,
                tree.species(),
                tree.year_planted(),
                tree.height(),
                tree.growth_rate()
            );
        }
        match stats.average_height {
            Some(average) => {
                let _ = writeln!(
                    report,
                    "There are {} trees, with an average height of {:.2} feet.",
                    stats.tree_count, average
                );
            }
            None => report.push_str("There are no trees in this forest.\n"),
        }
        report.push('\n');
        report
    }

    pub fn print_forest<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }
}
