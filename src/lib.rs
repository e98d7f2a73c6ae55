use std::error::Error;

use arrayvec::ArrayVec;

mod fmt;
mod parse;
pub mod solve;
mod terrain;

pub use terrain::Terrain;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoError {
    OffTerrain,
}

impl Error for GoError {}

/// Why [`solve::bfs`] came back without a move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoSolution {
    /// Every reachable state was explored and none is a goal.
    Exhausted,
    /// The state limit was hit before the search finished.
    LimitReached,
}

impl Error for NoSolution {}

/// Grid coordinates as (row, column). May point outside any terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub i32, pub i32);

impl Pos {
    fn shift(self, dx: i32, dy: i32) -> Self {
        Pos(self.0 + dx, self.1 + dy)
    }

    fn step(self, dir: Direction) -> Self {
        const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
        let (dx, dy) = DIRECTIONS[dir as usize];
        self.shift(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right = 0,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];
}

/// The block's footprint. Lying blocks are anchored at their top/left cell, so
/// two blocks covering the same cells always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Standing(Pos),
    Horizontal(Pos),
    Vertical(Pos),
}

impl Block {
    pub fn cells(self) -> ArrayVec<Pos, 2> {
        let mut cells = ArrayVec::new();
        match self {
            Block::Standing(pos) => cells.push(pos),
            Block::Horizontal(pos) => cells.extend([pos, pos.shift(0, 1)]),
            Block::Vertical(pos) => cells.extend([pos, pos.shift(1, 0)]),
        }
        cells
    }

    /// Tilt the block over one of its edges. No terrain check happens here.
    pub fn tilted(self, dir: Direction) -> Self {
        use Direction::*;

        match (self, dir) {
            (Block::Standing(pos), Right) => Block::Horizontal(pos.shift(0, 1)),
            (Block::Standing(pos), Left) => Block::Horizontal(pos.shift(0, -2)),
            (Block::Standing(pos), Down) => Block::Vertical(pos.shift(1, 0)),
            (Block::Standing(pos), Up) => Block::Vertical(pos.shift(-2, 0)),

            (Block::Horizontal(pos), Right) => Block::Standing(pos.shift(0, 2)),
            (Block::Horizontal(pos), Left) => Block::Standing(pos.shift(0, -1)),
            (Block::Horizontal(pos), Down | Up) => Block::Horizontal(pos.step(dir)),

            (Block::Vertical(pos), Down) => Block::Standing(pos.shift(2, 0)),
            (Block::Vertical(pos), Up) => Block::Standing(pos.shift(-1, 0)),
            (Block::Vertical(pos), Right | Left) => Block::Vertical(pos.step(dir)),
        }
    }
}

/// A parsed puzzle: the terrain plus its start and goal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    terrain: Terrain,
    start: Pos,
    goal: Pos,
}

impl Level {
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn start_block(&self) -> Block {
        Block::Standing(self.start)
    }

    pub fn is_goal(&self, block: Block) -> bool {
        block == Block::Standing(self.goal)
    }

    pub fn is_legal(&self, block: Block) -> bool {
        block
            .cells()
            .iter()
            .all(|&pos| self.terrain.is_terrain(pos))
    }
}

impl solve::Rules for Level {
    type State = Block;

    fn start_state(&self) -> Block {
        self.start_block()
    }

    fn is_goal(&self, block: &Block) -> bool {
        Level::is_goal(self, *block)
    }

    fn legal_moves(&self, block: &Block) -> ArrayVec<(Block, Direction), 4> {
        Direction::ALL
            .into_iter()
            .map(|dir| (block.tilted(dir), dir))
            .filter(|&(next, _)| self.is_legal(next))
            .collect()
    }
}

/// A level together with the current block position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub level: Level,
    pub block: Block,
}

impl Game {
    pub fn new(level: Level) -> Self {
        let block = level.start_block();
        Self { level, block }
    }

    pub fn is_success(&self) -> bool {
        self.level.is_goal(self.block)
    }

    pub fn go(&mut self, dir: Direction) -> Result<(), GoError> {
        let next = self.block.tilted(dir);
        if !self.level.is_legal(next) {
            return Err(GoError::OffTerrain);
        }
        self.block = next;
        Ok(())
    }
}
