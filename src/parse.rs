use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};

use crate::terrain::{GOAL, START};
use crate::{Direction, Game, Level, Terrain};

impl FromStr for Terrain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(|line| line.chars().collect::<Box<[char]>>())
            .collect::<Box<[_]>>();
        ensure!(!rows.is_empty(), "Empty terrain");
        Ok(Terrain { rows })
    }
}

impl Level {
    /// Locate the start and goal markers. With `strict`, a marker occurring more
    /// than once is rejected instead of resolving to its first occurrence.
    pub fn from_terrain(terrain: Terrain, strict: bool) -> Result<Self> {
        let find = |marker: char, what: &str| -> Result<_> {
            let mut found = terrain.markers(marker);
            let pos = found.next().with_context(|| format!("Missing {what}"))?;
            if strict {
                if let Some(dup) = found.next() {
                    bail!("Multiple {what}s: {pos:?} and {dup:?}");
                }
            }
            Ok(pos)
        };
        let start = find(START, "start")?;
        let goal = find(GOAL, "goal")?;
        Ok(Level {
            terrain,
            start,
            goal,
        })
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_terrain(s.parse()?, true)
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Game::new(s.parse()?))
    }
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        Ok(match ch {
            'R' => Direction::Right,
            'D' => Direction::Down,
            'L' => Direction::Left,
            'U' => Direction::Up,
            _ => bail!("Invalid action: {ch:?}"),
        })
    }
}
