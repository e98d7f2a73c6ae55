use std::fmt;

use crate::{Direction, Game, GoError, Level, NoSolution, Pos, Terrain};

const BLOCK: char = 'B';

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter() {
            for ch in row.iter() {
                ch.fmt(f)?;
            }
            "\n".fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.terrain().fmt(f)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.block.cells();
        for (row, x) in self.level.terrain().rows.iter().zip(0..) {
            for (&ch, y) in row.iter().zip(0..) {
                if cells.contains(&Pos(x, y)) {
                    BLOCK.fmt(f)?;
                } else {
                    ch.fmt(f)?;
                }
            }
            "\n".fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Right => "R".fmt(f),
            Direction::Down => "D".fmt(f),
            Direction::Left => "L".fmt(f),
            Direction::Up => "U".fmt(f),
        }
    }
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::OffTerrain => "Block falls off the terrain".fmt(f),
        }
    }
}

impl fmt::Display for NoSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoSolution::Exhausted => "No solution".fmt(f),
            NoSolution::LimitReached => "State limit reached".fmt(f),
        }
    }
}
