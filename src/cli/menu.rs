use std::fmt;

use crate::forest::Forest;

pub const MENU_PROMPT: &str =
    "(P)rint, (A)dd, (C)ut, (G)row, (R)eap, (S)ave, (L)oad, (N)ext, e(X)it : ";

/// One menu selection, entered as a single letter in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Print,
    Add,
    Cut,
    Grow,
    Reap,
    Save,
    Load,
    Next,
    Exit,
}

impl MenuCommand {
    pub fn parse(input: &str) -> Option<MenuCommand> {
        match input.trim().to_uppercase().as_str() {
            "P" => Some(MenuCommand::Print),
            "A" => Some(MenuCommand::Add),
            "C" => Some(MenuCommand::Cut),
            "G" => Some(MenuCommand::Grow),
            "R" => Some(MenuCommand::Reap),
            "S" => Some(MenuCommand::Save),
            "L" => Some(MenuCommand::Load),
            "N" => Some(MenuCommand::Next),
            "X" => Some(MenuCommand::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexInputError {
    NotAnInteger,
    NoSuchTree(i64),
}

impl fmt::Display for IndexInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexInputError::NotAnInteger => write!(f, "That is not an integer."),
            IndexInputError::NoSuchTree(n) => write!(f, "Error. Tree {} does not exist.", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightInputError {
    NotAnInteger,
    Negative,
}

impl fmt::Display for HeightInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightInputError::NotAnInteger => write!(f, "That is not an integer."),
            HeightInputError::Negative => write!(f, "Error. That is not a valid height."),
        }
    }
}

/// Validate a tree index typed at the cut prompt against the current forest.
pub fn parse_tree_index(input: &str, forest: &Forest) -> Result<usize, IndexInputError> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| IndexInputError::NotAnInteger)?;
    match usize::try_from(n) {
        Ok(index) if forest.contains_index(index) => Ok(index),
        _ => Err(IndexInputError::NoSuchTree(n)),
    }
}

/// Validate a reap threshold in whole feet.
pub fn parse_reap_height(input: &str) -> Result<u32, HeightInputError> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| HeightInputError::NotAnInteger)?;
    u32::try_from(n).map_err(|_| HeightInputError::Negative)
}
