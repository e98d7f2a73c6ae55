use crate::Pos;

pub const GROUND: char = 'o';
pub const START: char = 'S';
pub const GOAL: char = 'T';

/// The parsed character grid. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Terrain {
    pub(crate) rows: Box<[Box<[char]>]>,
}

impl Terrain {
    pub fn get(&self, pos: Pos) -> Option<char> {
        let x = usize::try_from(pos.0).ok()?;
        let y = usize::try_from(pos.1).ok()?;
        self.rows.get(x)?.get(y).copied()
    }

    pub fn is_terrain(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(GROUND | START | GOAL))
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
        self.rows.iter().zip(0..).flat_map(|(row, x)| {
            row.iter()
                .zip(0..)
                .map(move |(&ch, y)| (Pos(x, y), ch))
        })
    }

    /// All cells holding `marker`, in row-major order.
    pub fn markers(&self, marker: char) -> impl Iterator<Item = Pos> + '_ {
        self.cells()
            .filter(move |&(_, ch)| ch == marker)
            .map(|(pos, _)| pos)
    }

    /// The first cell holding `marker`. Duplicates are not detected here.
    pub fn find_marker(&self, marker: char) -> Option<Pos> {
        self.markers(marker).next()
    }
}
