use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MIN_YEAR_PLANTED: i32 = 2000;
pub const MAX_YEAR_PLANTED: i32 = 2024;
pub const MIN_HEIGHT: f64 = 10.0;
pub const MAX_NEW_HEIGHT: f64 = 30.0;
/// Growth rates are percentages per year.
pub const MIN_GROWTH_RATE: f64 = 10.0;
pub const MAX_GROWTH_RATE: f64 = 20.0;

// === Species ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Birch,
    Maple,
    Fir,
    Unknown,
}

impl Species {
    /// Species the random factory may pick. `Unknown` is never planted.
    pub const PLANTABLE: [Species; 3] = [Species::Birch, Species::Maple, Species::Fir];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Birch => "BIRCH",
            Species::Maple => "MAPLE",
            Species::Fir => "FIR",
            Species::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpeciesError(pub String);

impl fmt::Display for ParseSpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown species '{}'", self.0)
    }
}

impl std::error::Error for ParseSpeciesError {}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BIRCH" => Ok(Species::Birch),
            "MAPLE" => Ok(Species::Maple),
            "FIR" => Ok(Species::Fir),
            "UNKNOWN" => Ok(Species::Unknown),
            _ => Err(ParseSpeciesError(s.trim().to_string())),
        }
    }
}

// === Tree ===

/// A single tree. Values are not range-checked: file data is taken as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    species: Species,
    year_planted: i32,
    height: f64,
    growth_rate: f64,
}

impl Tree {
    pub fn new(species: Species, year_planted: i32, height: f64, growth_rate: f64) -> Self {
        Self {
            species,
            year_planted,
            height,
            growth_rate,
        }
    }

    /// Plant a tree with a random plantable species, a year in
    /// 2000..=2024, a height in [10, 30) feet and a growth rate in [10, 20) %.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let species = Species::PLANTABLE[rng.gen_range(0..Species::PLANTABLE.len())];
        Self {
            species,
            year_planted: rng.gen_range(MIN_YEAR_PLANTED..=MAX_YEAR_PLANTED),
            height: rng.gen_range(MIN_HEIGHT..MAX_NEW_HEIGHT),
            growth_rate: rng.gen_range(MIN_GROWTH_RATE..MAX_GROWTH_RATE),
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn year_planted(&self) -> i32 {
        self.year_planted
    }

    /// Height in feet.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Annual growth rate in percent.
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// One year of growth.
    pub fn grow(&mut self) {
        self.height *= 1.0 + self.growth_rate / 100.0;
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(Species::Unknown, 0, 0.0, 0.0)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:>4} {:>6.2}' {:>5.1}%",
            self.species, self.year_planted, self.height, self.growth_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn species_parse_is_case_insensitive_and_trimmed() {
        assert_eq!(" Birch ".parse::<Species>().unwrap(), Species::Birch);
        assert_eq!("maple".parse::<Species>().unwrap(), Species::Maple);
        assert_eq!("FIR".parse::<Species>().unwrap(), Species::Fir);
        assert_eq!("unknown".parse::<Species>().unwrap(), Species::Unknown);
    }

    #[test]
    fn species_parse_rejects_unlisted_names() {
        let err = "oak".parse::<Species>().unwrap_err();
        assert_eq!(err, ParseSpeciesError("oak".to_string()));
        assert!("".parse::<Species>().is_err());
    }

    #[test]
    fn species_display_honours_width() {
        assert_eq!(format!("{:<6}|", Species::Fir), "FIR   |");
        assert_eq!(format!("{}", Species::Unknown), "UNKNOWN");
    }

    #[test]
    fn constructor_accepts_out_of_range_values() {
        let tree = Tree::new(Species::Maple, 1850, 2.0, -5.0);
        assert_eq!(tree.year_planted(), 1850);
        assert_eq!(tree.height(), 2.0);
        assert_eq!(tree.growth_rate(), -5.0);
    }

    #[test]
    fn default_tree_is_unknown_and_zeroed() {
        let tree = Tree::default();
        assert_eq!(tree.species(), Species::Unknown);
        assert_eq!(tree.year_planted(), 0);
        assert_eq!(tree.height(), 0.0);
        assert_eq!(tree.growth_rate(), 0.0);
    }

    #[test]
    fn random_trees_stay_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let tree = Tree::random(&mut rng);
            assert_ne!(tree.species(), Species::Unknown);
            assert!((2000..=2024).contains(&tree.year_planted()));
            assert!(tree.height() >= 10.0 && tree.height() < 30.0);
            // Stored as a percentage, not a fraction.
            assert!(tree.growth_rate() >= 10.0 && tree.growth_rate() < 20.0);
        }
    }

    #[test]
    fn random_trees_cover_every_plantable_species() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(Tree::random(&mut rng).species());
        }
        assert_eq!(seen.len(), Species::PLANTABLE.len());
    }

    #[test]
    fn same_seed_same_tree() {
        let a = Tree::random(&mut ChaCha8Rng::seed_from_u64(42));
        let b = Tree::random(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn growth_applies_percentage_rate() {
        let mut tree = Tree::new(Species::Birch, 2010, 15.0, 12.0);
        tree.grow();
        assert!((tree.height() - 16.8).abs() < 1e-9);
    }

    #[test]
    fn growth_compounds_over_years() {
        let mut tree = Tree::new(Species::Fir, 2020, 20.0, 15.0);
        for _ in 0..5 {
            tree.grow();
        }
        let expected = 20.0 * 1.15_f64.powi(5);
        assert!((tree.height() - expected).abs() < 1e-9);
    }

    #[test]
    fn display_matches_console_layout() {
        let tree = Tree::new(Species::Birch, 2010, 15.0, 12.0);
        assert_eq!(tree.to_string(), "BIRCH 2010  15.00'  12.0%");
        let tree = Tree::new(Species::Fir, 2001, 123.456, 9.96);
        assert_eq!(tree.to_string(), "FIR  2001 123.46'  10.0%");
    }
}
