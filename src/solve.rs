use std::hash::Hash;

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::{Direction, NoSolution};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

const ROOT: usize = !0usize; // Sentinel parent of the start state.

/// Game rules the search explores.
pub trait Rules {
    type State: Clone + Eq + Hash;

    fn start_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Successors in each direction. Moves that leave the terrain are omitted.
    fn legal_moves(&self, state: &Self::State) -> ArrayVec<(Self::State, Direction), 4>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<S> {
    pub index: usize,
    pub depth: usize,
    pub state: S,
}

/// Lazy breadth-first traversal over every state reachable from the start.
///
/// Nodes come out in non-decreasing depth and each distinct state is yielded
/// exactly once. A layer is only expanded when the consumer has pulled every
/// node of the previous one.
pub struct Search<'a, R: Rules> {
    rules: &'a R,
    // Insertion order is discovery order, so each layer is a contiguous range.
    explored: IndexMap<R::State, (usize, Direction)>,
    layer_start: usize,
    layer_end: usize,
    cursor: usize,
    depth: usize,
}

impl<'a, R: Rules> Search<'a, R> {
    pub fn new(rules: &'a R) -> Self {
        let mut explored = IndexMap::default();
        explored.insert(rules.start_state(), (ROOT, Direction::Right));
        Self {
            rules,
            explored,
            layer_start: 0,
            layer_end: 1,
            cursor: 0,
            depth: 0,
        }
    }

    /// Number of distinct states discovered so far.
    pub fn explored(&self) -> usize {
        self.explored.len()
    }

    /// Moves leading from the start to the node at `index`, first move first.
    /// `None` if no state with that index has been discovered.
    pub fn history(&self, index: usize) -> Option<Vec<Direction>> {
        self.explored.get_index(index)?;
        Some(self.steps_to(index))
    }

    // Parent links always point at earlier, valid indices.
    fn steps_to(&self, index: usize) -> Vec<Direction> {
        let mut steps = std::iter::successors(Some(index), |&i| {
            let (parent, _) = self.explored[i];
            (parent != ROOT).then_some(parent)
        })
        .filter_map(|i| {
            let (parent, dir) = self.explored[i];
            (parent != ROOT).then_some(dir)
        })
        .collect::<Vec<_>>();
        steps.reverse();
        steps
    }

    /// The goal nodes among the traversal, still ordered by depth.
    pub fn goals(self) -> impl Iterator<Item = Node<R::State>> + 'a {
        let rules = self.rules;
        self.filter(move |node| rules.is_goal(&node.state))
    }

    fn expand(&mut self) {
        if self.layer_start == self.layer_end {
            return;
        }

        #[cfg(feature = "coz")]
        coz::scope!("Expand layer");

        for parent in self.layer_start..self.layer_end {
            let Some((state, _)) = self.explored.get_index(parent) else {
                break;
            };
            for (next, dir) in self.rules.legal_moves(state) {
                self.explored.entry(next).or_insert((parent, dir));
            }
        }

        self.layer_start = self.layer_end;
        self.layer_end = self.explored.len();
        if self.layer_start != self.layer_end {
            self.depth += 1;
            debug!(
                "Layer {}: {} new states",
                self.depth,
                self.layer_end - self.layer_start,
            );
        }
    }
}

impl<R: Rules> Iterator for Search<'_, R> {
    type Item = Node<R::State>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.layer_end {
            self.expand();
        }

        #[cfg(feature = "coz")]
        coz::progress!("Step");

        let (state, _) = self.explored.get_index(self.cursor)?;
        let node = Node {
            index: self.cursor,
            depth: self.depth,
            state: state.clone(),
        };
        self.cursor += 1;
        Some(node)
    }
}

/// Shortest move sequence to a goal state.
///
/// With `limit`, gives up after pulling that many states and reports
/// [`NoSolution::LimitReached`] unless the whole space was already covered.
pub fn bfs<R: Rules>(
    rules: &R,
    limit: Option<usize>,
    mut on_step: impl FnMut(&Node<R::State>),
) -> Result<Vec<Direction>, NoSolution> {
    let mut search = Search::new(rules);
    let found = search
        .by_ref()
        .take(limit.unwrap_or(usize::MAX))
        .inspect(|node| on_step(node))
        .find(|node| rules.is_goal(&node.state));

    match found {
        Some(node) => {
            info!(
                "Found a {}-move solution after {} states",
                node.depth,
                search.explored(),
            );
            Ok(search.steps_to(node.index))
        }
        // Anything left to pull means the limit cut the search short.
        None if search.next().is_some() => {
            info!("Gave up after {} states", search.explored());
            Err(NoSolution::LimitReached)
        }
        None => {
            info!("No solution, explored {} states", search.explored());
            Err(NoSolution::Exhausted)
        }
    }
}

/// Like [`bfs`], but an unreachable goal yields an empty move list.
pub fn shortest_moves<R: Rules>(rules: &R) -> Vec<Direction> {
    bfs(rules, None, |_| {}).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{Block, Game, Level, Pos};

    const LEVEL_1: &str = "\
ooo-------
oSoooo----
ooooooooo-
-ooooooooo
-----ooToo
------ooo-";

    fn replay(map: &str, steps: &[Direction]) -> Game {
        let mut game = map.parse::<Game>().unwrap();
        for &dir in steps {
            game.go(dir).unwrap();
        }
        game
    }

    #[test]
    fn states_are_yielded_once() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        let mut search = Search::new(&level);
        let mut seen = HashSet::new();
        for node in search.by_ref() {
            assert!(seen.insert(node.state), "{:?} yielded twice", node.state);
        }
        assert_eq!(seen.len(), search.explored());
        assert!(seen.contains(&Block::Standing(level.goal())));
    }

    #[test]
    fn depth_never_decreases() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        let depths = Search::new(&level)
            .map(|node| node.depth)
            .collect::<Vec<_>>();
        assert_eq!(depths[0], 0);
        assert!(depths.windows(2).all(|w| w[0] <= w[1] && w[1] <= w[0] + 1));
    }

    #[test]
    fn first_goal_is_shortest() {
        let level = "SooT\noooo".parse::<Level>().unwrap();
        let goals = Search::new(&level).goals().collect::<Vec<_>>();
        assert_eq!(goals.len(), 1);

        // Two goals at the same distance, one each way round.
        let rules = Ring {
            size: 12,
            goals: vec![3, 9],
        };
        let depths = Search::new(&rules)
            .goals()
            .map(|node| node.depth)
            .collect::<Vec<_>>();
        assert_eq!(depths, [3, 3]);
        let first = Search::new(&rules).goals().next().unwrap();
        assert!(depths.iter().all(|&d| first.depth <= d));
    }

    #[test]
    fn level_1() {
        let steps = shortest_moves(&LEVEL_1.parse::<Level>().unwrap());
        assert_eq!(steps.len(), 7);
        assert!(replay(LEVEL_1, &steps).is_success());
    }

    #[test]
    fn scenario_a() {
        use Direction::*;

        let steps = shortest_moves(&"ST\noo\noo".parse::<Level>().unwrap());
        assert_eq!(steps, [Down, Right, Up]);
    }

    #[test]
    fn isolated_goal() {
        let map = "So-T\noo-o\n---o";
        let level = map.parse::<Level>().unwrap();
        assert!(shortest_moves(&level).is_empty());
        assert_eq!(bfs(&level, None, |_| {}), Err(NoSolution::Exhausted));
        // A limit larger than the reachable space still proves unsolvability.
        assert_eq!(bfs(&level, Some(100), |_| {}), Err(NoSolution::Exhausted));
    }

    #[test]
    fn corridor() {
        // Standing positions along a single row are three cells apart.
        for len in [4, 7, 10, 13] {
            let map = format!("S{}T", "o".repeat(len - 2));
            let steps = shortest_moves(&map.parse::<Level>().unwrap());
            assert_eq!(steps, vec![Direction::Right; (len - 1) / 3 * 2], "{map}");
        }
        for len in [3, 5, 6, 8] {
            let map = format!("S{}T", "o".repeat(len - 2));
            assert!(shortest_moves(&map.parse::<Level>().unwrap()).is_empty());
        }
    }

    #[test]
    fn already_at_goal() {
        let rules = Ring {
            size: 4,
            goals: vec![0],
        };
        assert_eq!(bfs(&rules, None, |_| {}), Ok(Vec::new()));
    }

    #[test]
    fn limit_stops_early() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        let mut steps = 0;
        assert_eq!(
            bfs(&level, Some(5), |_| steps += 1),
            Err(NoSolution::LimitReached)
        );
        assert_eq!(steps, 5);
    }

    #[test]
    fn limit_is_not_unsolvable() {
        let solvable = "SooooooooT".parse::<Level>().unwrap();
        let unsolvable = "SooooT".parse::<Level>().unwrap();
        let limited = bfs(&solvable, Some(2), |_| {});
        assert_eq!(limited, Err(NoSolution::LimitReached));
        assert_ne!(limited, bfs(&unsolvable, None, |_| {}));
        assert_eq!(bfs(&solvable, None, |_| {}).map(|s| s.len()), Ok(6));
    }

    #[test]
    fn history_replays_to_node() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        let mut search = Search::new(&level);
        let nodes = search.by_ref().collect::<Vec<_>>();
        for node in nodes {
            let steps = search.history(node.index).unwrap();
            assert_eq!(steps.len(), node.depth);
            assert_eq!(replay(LEVEL_1, &steps).block, node.state);
        }
    }

    #[test]
    fn history_of_unknown_index() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        let search = Search::new(&level);
        assert_eq!(search.history(0), Some(Vec::new()));
        assert_eq!(search.history(5), None);
        assert_eq!(search.history(usize::MAX), None);
    }

    #[test]
    fn start_is_terrain() {
        let level = LEVEL_1.parse::<Level>().unwrap();
        assert_eq!(level.start(), Pos(1, 1));
        assert!(level.is_legal(level.start_block()));
    }

    /// Positions on a cycle, stepping either way.
    struct Ring {
        size: usize,
        goals: Vec<usize>,
    }

    impl Rules for Ring {
        type State = usize;

        fn start_state(&self) -> usize {
            0
        }

        fn is_goal(&self, state: &usize) -> bool {
            self.goals.contains(state)
        }

        fn legal_moves(&self, &state: &usize) -> ArrayVec<(usize, Direction), 4> {
            [
                ((state + 1) % self.size, Direction::Right),
                ((state + self.size - 1) % self.size, Direction::Left),
            ]
            .into_iter()
            .collect()
        }
    }
}
