use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::cli::menu::{MENU_PROMPT, MenuCommand, parse_reap_height, parse_tree_index};
use crate::config::SimulationConfig;
use crate::forest::Forest;
use crate::persistence;

/// How a forest's menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    NextForest,
    Exit,
}

/// Build the tree factory RNG. A zero seed is replaced by a random one,
/// which is logged so the session can be replayed.
pub fn session_rng(seed: u64) -> ChaCha8Rng {
    let seed = if seed == 0 {
        let drawn: u64 = rand::thread_rng().r#gen();
        warn!(seed = drawn, "Seeded tree factory from entropy; pass --seed to replay");
        drawn
    } else {
        info!(seed, "Seeded tree factory");
        seed
    };
    ChaCha8Rng::seed_from_u64(seed)
}

/// Run the console simulation on stdin/stdout over the named forests.
pub fn run_interactive(config: &SimulationConfig, names: &[String]) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        config.data_dir(),
        session_rng(config.seed),
        stdin.lock(),
        stdout.lock(),
    );
    session.run(names)
}

/// Interactive controller. Walks the forest names in order, running the
/// menu on each forest that loads. End of input is treated as exit.
pub struct Session<R, W> {
    data_dir: PathBuf,
    rng: ChaCha8Rng,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(data_dir: PathBuf, rng: ChaCha8Rng, input: R, output: W) -> Self {
        Self {
            data_dir,
            rng,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self, names: &[String]) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Forestry Simulation")?;
        writeln!(self.output, "----------------------------------")?;

        for name in names {
            writeln!(self.output, "Initializing forest from: {}\n", name)?;
            match persistence::next_forest(&self.data_dir, name) {
                Ok(forest) => {
                    if self.execute_menu(forest)? == MenuOutcome::Exit {
                        break;
                    }
                }
                Err(e) => {
                    warn!(forest = %name, error = %e, "Cannot initialize forest");
                    writeln!(self.output, "{}", e)?;
                    writeln!(self.output, "Failed to load forest: {}", name)?;
                }
            }
        }

        writeln!(self.output, "\nExiting the simulation")?;
        self.output.flush()
    }

    /// Menu loop for one forest. `Load` may swap in a different forest.
    pub fn execute_menu(&mut self, mut forest: Forest) -> io::Result<MenuOutcome> {
        loop {
            let Some(command) = self.read_menu_command()? else {
                return Ok(MenuOutcome::Exit);
            };

            match command {
                MenuCommand::Print => forest.print_forest(&mut self.output)?,
                MenuCommand::Add => forest.add_random_tree(&mut self.rng),
                MenuCommand::Cut => {
                    if forest.is_empty() {
                        writeln!(self.output, "There are no trees to cut.")?;
                        continue;
                    }
                    let Some(index) = self.prompt_tree_index(&forest)? else {
                        return Ok(MenuOutcome::Exit);
                    };
                    if let Err(e) = forest.cut_tree_by_index(index) {
                        writeln!(self.output, "{}", e)?;
                    }
                }
                MenuCommand::Grow => forest.simulate_tree_growth(),
                MenuCommand::Reap => {
                    let Some(limit) = self.prompt_reap_height()? else {
                        return Ok(MenuOutcome::Exit);
                    };
                    forest.reap_forest(f64::from(limit), &mut self.rng, &mut self.output)?;
                }
                MenuCommand::Save => self.save(&forest)?,
                MenuCommand::Load => {
                    writeln!(self.output, "Enter forest name:")?;
                    let Some(name) = self.read_line()? else {
                        return Ok(MenuOutcome::Exit);
                    };
                    if let Some(loaded) = self.load(name.trim())? {
                        forest = loaded;
                    }
                }
                MenuCommand::Next => {
                    writeln!(self.output, "Moving to the next forest")?;
                    return Ok(MenuOutcome::NextForest);
                }
                MenuCommand::Exit => return Ok(MenuOutcome::Exit),
            }
        }
    }

    fn save(&mut self, forest: &Forest) -> io::Result<()> {
        if let Err(e) = persistence::save_forest(forest, &self.data_dir) {
            let file = match forest.name() {
                Some(name) => persistence::snapshot_path(&self.data_dir, name)
                    .display()
                    .to_string(),
                None => "(unnamed)".to_string(),
            };
            warn!(file = %file, error = %e, "Cannot save forest");
            writeln!(self.output, "Error in saving to {}: {}", file, e)?;
        }
        Ok(())
    }

    /// `None` keeps the current forest.
    fn load(&mut self, name: &str) -> io::Result<Option<Forest>> {
        let path = persistence::snapshot_path(&self.data_dir, name);
        match persistence::load_forest(&path) {
            Ok(forest) => Ok(Some(forest)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot load forest snapshot");
                writeln!(self.output, "Error opening/reading {}: {}", path.display(), e)?;
                writeln!(self.output, "Old forest retained")?;
                Ok(None)
            }
        }
    }

    fn read_menu_command(&mut self) -> io::Result<Option<MenuCommand>> {
        writeln!(self.output, "{}", MENU_PROMPT)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(command) = MenuCommand::parse(&line) {
                return Ok(Some(command));
            }
            writeln!(self.output, "Invalid menu option, try again")?;
            writeln!(self.output, "{}", MENU_PROMPT)?;
        }
    }

    fn prompt_tree_index(&mut self, forest: &Forest) -> io::Result<Option<usize>> {
        loop {
            writeln!(self.output, "Tree to cut down:")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_tree_index(&line, forest) {
                Ok(index) => return Ok(Some(index)),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn prompt_reap_height(&mut self) -> io::Result<Option<u32>> {
        loop {
            writeln!(self.output, "Height to reap from:")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_reap_height(&line) {
                Ok(height) => return Ok(Some(height)),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    /// Next input line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
