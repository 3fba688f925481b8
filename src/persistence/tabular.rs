use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::forest::{Forest, Species, Tree};

/// Errors that can occur while reading a `<name>.csv` forest file.
#[derive(Debug)]
pub enum TabularError {
    NotFound(PathBuf),
    Io(PathBuf, io::Error),
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl std::fmt::Display for TabularError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabularError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            TabularError::Io(path, e) => write!(f, "Error reading {}: {}", path.display(), e),
            TabularError::Parse {
                path,
                line,
                message,
            } => write!(f, "Error reading {} line {}: {}", path.display(), line, message),
        }
    }
}

impl std::error::Error for TabularError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabularError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Build the `.csv` path for a forest base name.
pub fn tabular_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.csv", name))
}

/// Load the forest `name` from `<data_dir>/<name>.csv`.
///
/// One tree per line: `species,yearPlanted,height,growthRate`. Any malformed
/// line fails the whole load.
pub fn next_forest(data_dir: &Path, name: &str) -> Result<Forest, TabularError> {
    let path = tabular_path(data_dir, name);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TabularError::NotFound(path));
        }
        Err(e) => return Err(TabularError::Io(path, e)),
    };

    let trees = parse_trees(&content).map_err(|(line, message)| TabularError::Parse {
        path: path.clone(),
        line,
        message,
    })?;

    info!(path = %path.display(), trees = trees.len(), "Loaded forest");
    Ok(Forest::named(name, trees))
}

/// Parse CSV text into trees in file order. Errors carry the 1-based line.
fn parse_trees(content: &str) -> Result<Vec<Tree>, (usize, String)> {
    let mut trees = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        trees.push(parse_tree_line(line).map_err(|message| (i + 1, message))?);
    }
    Ok(trees)
}

fn parse_tree_line(line: &str) -> Result<Tree, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(format!(
            "expected 4 fields (species,year,height,growth rate), got {}",
            fields.len()
        ));
    }

    let species: Species = fields[0].parse().map_err(|e| format!("{}", e))?;
    let year_planted = fields[1]
        .parse::<i32>()
        .map_err(|e| format!("invalid year '{}': {}", fields[1], e))?;
    let height = fields[2]
        .parse::<f64>()
        .map_err(|e| format!("invalid height '{}': {}", fields[2], e))?;
    let growth_rate = fields[3]
        .parse::<f64>()
        .map_err(|e| format!("invalid growth rate '{}': {}", fields[3], e))?;

    Ok(Tree::new(species, year_planted, height, growth_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(format!("{}.csv", name)), content).unwrap();
    }

    #[test]
    fn loads_sample_forest_in_file_order() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "sample", "Birch, 2010, 15.00, 12.0\nmaple,2015,20.50,15.0\n");

        let forest = next_forest(dir.path(), "sample").unwrap();
        assert_eq!(forest.name(), Some("sample"));
        assert_eq!(forest.len(), 2);
        assert_eq!(
            forest.get(0),
            Some(&Tree::new(Species::Birch, 2010, 15.0, 12.0))
        );
        assert_eq!(
            forest.get(1),
            Some(&Tree::new(Species::Maple, 2015, 20.5, 15.0))
        );
    }

    #[test]
    fn growth_rate_is_stored_as_written() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "rates", "fir,2001,10,17.5");
        let forest = next_forest(dir.path(), "rates").unwrap();
        assert_eq!(forest.get(0).unwrap().growth_rate(), 17.5);
    }

    #[test]
    fn missing_file_names_the_csv() {
        let dir = TempDir::new().unwrap();
        let err = next_forest(dir.path(), "nowhere").unwrap_err();
        assert!(matches!(err, TabularError::NotFound(_)));
        assert!(err.to_string().starts_with("File not found: "));
        assert!(err.to_string().ends_with("nowhere.csv"));
    }

    #[test]
    fn unknown_species_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "oaks", "birch,2010,15,12\noak,2011,16,12\n");
        match next_forest(dir.path(), "oaks").unwrap_err() {
            TabularError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("oak"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn malformed_numbers_rejected() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "bad_year", "birch,twenty,15,12");
        write_csv(&dir, "bad_height", "birch,2010,tall,12");
        write_csv(&dir, "bad_rate", "birch,2010,15,fast");

        for (name, needle) in [
            ("bad_year", "year"),
            ("bad_height", "height"),
            ("bad_rate", "growth rate"),
        ] {
            let err = next_forest(dir.path(), name).unwrap_err();
            assert!(err.to_string().contains(needle), "{}: {}", name, err);
        }
    }

    #[test]
    fn wrong_field_count_rejected() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "short", "birch,2010,15");
        write_csv(&dir, "long", "birch,2010,15,12,extra");
        assert!(next_forest(dir.path(), "short").is_err());
        assert!(next_forest(dir.path(), "long").is_err());
    }

    #[test]
    fn blank_lines_skipped() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "gaps", "\nbirch,2010,15,12\n   \nfir,2011,16,13\n\n");
        let forest = next_forest(dir.path(), "gaps").unwrap();
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn empty_file_gives_empty_forest() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "bare", "");
        let forest = next_forest(dir.path(), "bare").unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.name(), Some("bare"));
    }

    #[test]
    fn tabular_path_appends_extension() {
        let path = tabular_path(Path::new("data"), "north");
        assert_eq!(path, Path::new("data").join("north.csv"));
    }
}
