//! Move Resolver
//!
//! Resolves one directional move by advancing every movable tile a fixed
//! pixel step per pass, until a full pass moves nothing.
//!
//! ## Pass order
//!
//! Tiles are sorted nearest-edge-first on every pass. A tile's neighbor is
//! therefore always processed before the tile itself, so a merge or stop
//! ahead is visible to the tiles queued behind it within the same pass.
//! Cell occupancy is tracked live during the pass, and a tile never steps
//! into a cell another tile still holds.
//!
//! ## Termination
//!
//! Every moving tile travels toward the destination edge and its cell is
//! re-derived after each step, so it either reaches the edge, closes on a
//! blocker, or is absorbed by a merge. A pass with no movement ends the move.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::game::board::{Board, BoardError};
use crate::game::direction::{Direction, MoveRule};
use crate::game::tile::{Cell, Tile, TileId};

/// Two tiles combined during a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Tile that stayed and doubled
    pub survivor: TileId,
    /// Tile that slid in and disappeared
    pub absorbed: TileId,
    /// Cell of the survivor
    pub cell: Cell,
    /// Value after doubling
    pub value: u32,
}

/// What one pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// At least one tile moved or merged
    pub moved: bool,
    /// Merges completed this pass
    pub merges: Vec<Merge>,
}

/// In-flight resolution of a single move.
///
/// Holds the merge-lock set: tiles that already merged during this move and
/// may not merge again. Dropped once the move settles.
#[derive(Clone, Debug)]
pub struct Resolution {
    rule: MoveRule,
    locks: BTreeSet<TileId>,
    passes: u32,
    moved: bool,
    merges: u32,
    settled: bool,
}

impl Resolution {
    /// Start resolving a move.
    pub fn new(direction: Direction) -> Self {
        Self {
            rule: direction.rule(),
            locks: BTreeSet::new(),
            passes: 0,
            moved: false,
            merges: 0,
            settled: false,
        }
    }

    /// Direction being resolved.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.rule.direction
    }

    /// Passes run so far, including the final still pass.
    #[inline]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Any tile moved during this move.
    #[inline]
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Merges completed during this move.
    #[inline]
    pub fn merges(&self) -> u32 {
        self.merges
    }

    /// A pass has moved nothing; the board is settled.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Tile already merged during this move.
    #[inline]
    pub fn is_locked(&self, id: TileId) -> bool {
        self.locks.contains(&id)
    }

    /// Advance every movable tile by one step and publish the result to the board.
    ///
    /// Once settled, further calls do nothing. Fails only if two surviving
    /// tiles end the pass on the same cell, which means the board is corrupt.
    pub fn run_pass(&mut self, board: &mut Board) -> Result<PassReport, BoardError> {
        let mut report = PassReport::default();
        if self.settled {
            return Ok(report);
        }

        let geometry = *board.geometry();
        let rule = self.rule;

        let mut working: Vec<Tile> = board.tiles().copied().collect();
        working.sort_by(|a, b| rule.order(a, b));

        // Live occupancy: updated the moment a tile changes cell or is absorbed,
        // so tiles later in the pass see where earlier tiles actually are.
        let mut occupancy: BTreeMap<Cell, usize> = working
            .iter()
            .enumerate()
            .map(|(i, tile)| (tile.cell, i))
            .collect();
        let mut removed = vec![false; working.len()];

        for i in 0..working.len() {
            let tile = working[i];
            if rule.is_at_boundary(&tile, &geometry) {
                continue;
            }

            let neighbor = rule
                .ahead(tile.cell, &geometry)
                .and_then(|cell| occupancy.get(&cell).copied());

            let step = match neighbor {
                None => true,
                Some(j) => {
                    let next = working[j];
                    let can_merge = tile.value == next.value
                        && !self.locks.contains(&tile.id)
                        && !self.locks.contains(&next.id);

                    if can_merge && !rule.merge_in_progress(&tile, &next, &geometry) {
                        working[j].value *= 2;
                        removed[i] = true;
                        occupancy.remove(&tile.cell);
                        self.locks.insert(next.id);
                        report.merges.push(Merge {
                            survivor: next.id,
                            absorbed: tile.id,
                            cell: next.cell,
                            value: working[j].value,
                        });
                        false
                    } else {
                        can_merge || rule.clear_to_move(&tile, &next, &geometry)
                    }
                }
            };

            if step {
                let mut stepped = tile;
                stepped.translate(rule.step_delta(&geometry));
                rule.settle(&mut stepped, &geometry);

                // A tile closing on its merge partner waits while another
                // tile still holds the cell it would enter.
                if occupancy.get(&stepped.cell).is_some_and(|&j| j != i) {
                    continue;
                }
                if stepped.cell != tile.cell {
                    occupancy.remove(&tile.cell);
                    occupancy.insert(stepped.cell, i);
                }
                working[i] = stepped;
            } else if !removed[i] {
                continue;
            }

            report.moved = true;

            #[cfg(feature = "debug-tracing")]
            trace!(
                tile = working[i].id.0,
                value = working[i].value,
                x = working[i].x,
                y = working[i].y,
                cell = %working[i].cell,
                removed = removed[i],
                "tile stepped"
            );
        }

        board.rebuild_from(
            working
                .into_iter()
                .zip(removed)
                .filter(|(_, gone)| !gone)
                .map(|(tile, _)| tile),
        )?;

        self.passes += 1;
        self.merges += report.merges.len() as u32;
        if report.moved {
            self.moved = true;
        } else {
            self.settled = true;
            board.snap_to_grid();
        }

        trace!(
            direction = %rule.direction,
            pass = self.passes,
            moved = report.moved,
            merges = report.merges.len(),
            "resolution pass"
        );

        Ok(report)
    }

    /// Run passes until the board settles. Returns the number of passes.
    pub fn run_to_completion(&mut self, board: &mut Board) -> Result<u32, BoardError> {
        while !self.settled {
            self.run_pass(board)?;
        }
        Ok(self.passes)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Geometry;

    fn board(rows: &[[u32; 4]]) -> Board {
        Board::from_rows(Geometry::default(), rows).unwrap()
    }

    fn resolve(board: &mut Board, direction: Direction) -> Resolution {
        let mut resolution = Resolution::new(direction);
        resolution.run_to_completion(board).unwrap();
        resolution
    }

    fn rows(board: &Board) -> Vec<Vec<u32>> {
        board.to_rows()
    }

    #[test]
    fn test_pair_merges_left() {
        let mut b = board(&[[2, 2, 0, 0]]);
        let resolution = resolve(&mut b, Direction::Left);

        assert_eq!(b.value_at(0, 0), Some(4));
        assert_eq!(b.len(), 1);
        assert_eq!(resolution.merges(), 1);
        assert!(resolution.moved());
    }

    #[test]
    fn test_slide_to_each_edge() {
        let mut b = board(&[[0, 0, 0, 0], [0, 8, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        resolve(&mut b, Direction::Right);
        assert_eq!(b.value_at(1, 3), Some(8));

        resolve(&mut b, Direction::Down);
        assert_eq!(b.value_at(3, 3), Some(8));

        resolve(&mut b, Direction::Left);
        assert_eq!(b.value_at(3, 0), Some(8));

        resolve(&mut b, Direction::Up);
        assert_eq!(b.value_at(0, 0), Some(8));

        let tile = b.get(Cell::new(0, 0)).unwrap();
        assert_eq!((tile.x, tile.y), (0, 0));
    }

    #[test]
    fn test_merge_once_per_move() {
        // Classic rule: [2, 2, 4] -> [4, 4], not [8]
        let mut b = board(&[[2, 2, 4, 0]]);
        resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![4, 4, 0, 0]);

        // [4, 4, 8] right -> [.., 8, 8]
        let mut b = board(&[[0, 8, 4, 4]]);
        resolve(&mut b, Direction::Right);
        assert_eq!(rows(&b)[0], vec![0, 0, 8, 8]);
    }

    #[test]
    fn test_two_pairs_in_a_row() {
        let mut b = board(&[[2, 2, 2, 2]]);
        let resolution = resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![4, 4, 0, 0]);
        assert_eq!(resolution.merges(), 2);
    }

    #[test]
    fn test_three_equal_merge_nearest_edge_first() {
        let mut b = board(&[[2, 2, 2, 0]]);
        resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![4, 2, 0, 0]);

        let mut b = board(&[[0, 2, 2, 2]]);
        resolve(&mut b, Direction::Right);
        assert_eq!(rows(&b)[0], vec![0, 0, 2, 4]);
    }

    #[test]
    fn test_pair_behind_stopping_tile_waits_for_its_cell() {
        let mut b = board(&[[0, 4, 2, 2]]);
        resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![4, 4, 0, 0]);

        let mut b = board(&[[0, 2, 8, 8]]);
        resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![2, 16, 0, 0]);
    }

    #[test]
    fn test_two_unequal_pairs_merge_separately() {
        let mut b = board(&[[2, 2, 4, 4]]);
        let resolution = resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![4, 8, 0, 0]);
        assert_eq!(resolution.merges(), 2);

        let mut b = board(&[[4, 4, 2, 2]]);
        let resolution = resolve(&mut b, Direction::Right);
        assert_eq!(rows(&b)[0], vec![0, 0, 8, 4]);
        assert_eq!(resolution.merges(), 2);
    }

    #[test]
    fn test_converging_pairs_vertical() {
        let column = |b: &Board| -> Vec<u32> { rows(b).iter().map(|row| row[0]).collect() };

        let mut b = board(&[[0, 0, 0, 0], [4, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]);
        resolve(&mut b, Direction::Up);
        assert_eq!(column(&b), vec![4, 4, 0, 0]);

        let mut b = board(&[[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]]);
        resolve(&mut b, Direction::Up);
        assert_eq!(column(&b), vec![4, 8, 0, 0]);

        let mut b = board(&[[4, 0, 0, 0], [4, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]);
        resolve(&mut b, Direction::Down);
        assert_eq!(column(&b), vec![0, 0, 8, 4]);
    }

    #[test]
    fn test_every_pass_keeps_one_tile_per_cell() {
        let mut b = board(&[[0, 4, 2, 2], [2, 2, 4, 4], [4, 4, 2, 2], [2, 2, 2, 2]]);
        for direction in Direction::ALL {
            let mut resolution = Resolution::new(direction);
            while !resolution.is_settled() {
                let before = b.len();
                let report = resolution.run_pass(&mut b).unwrap();
                assert_eq!(b.len(), before - report.merges.len());
            }
        }
    }

    /// Slide-and-merge of one row toward index 0, each tile merging at most once.
    fn fold(row: [u32; 4]) -> Vec<u32> {
        let values: Vec<u32> = row.into_iter().filter(|&v| v != 0).collect();
        let mut out = Vec::new();
        let mut i = 0;
        while i < values.len() {
            if values.get(i + 1) == Some(&values[i]) {
                out.push(values[i] * 2);
                i += 2;
            } else {
                out.push(values[i]);
                i += 1;
            }
        }
        out.resize(4, 0);
        out
    }

    #[test]
    fn test_every_small_row_matches_fold() {
        const VALUES: [u32; 4] = [0, 2, 4, 8];
        for code in 0..256usize {
            let row = [0usize, 1, 2, 3].map(|i| VALUES[(code >> (2 * i)) & 3]);

            let mut b = board(&[row]);
            resolve(&mut b, Direction::Left);
            assert_eq!(rows(&b)[0], fold(row), "left {row:?}");

            let mut reversed = row;
            reversed.reverse();
            let mut expected = fold(reversed);
            expected.reverse();
            let mut b = board(&[row]);
            resolve(&mut b, Direction::Right);
            assert_eq!(rows(&b)[0], expected, "right {row:?}");
        }
    }

    #[test]
    fn test_blocked_tiles_stack() {
        let mut b = board(&[[0, 2, 0, 4]]);
        resolve(&mut b, Direction::Left);
        assert_eq!(rows(&b)[0], vec![2, 4, 0, 0]);

        let mut b = board(&[[2, 0, 4, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        resolve(&mut b, Direction::Down);
        assert_eq!(b.value_at(3, 0), Some(2));
        assert_eq!(b.value_at(3, 2), Some(4));
    }

    #[test]
    fn test_vertical_merge() {
        let mut b = board(&[[4, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [8, 0, 0, 0]]);
        resolve(&mut b, Direction::Up);
        assert_eq!(b.value_at(0, 0), Some(8));
        assert_eq!(b.value_at(1, 0), Some(8));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let mut b = board(&[[2, 4, 0, 0], [8, 0, 0, 0]]);
        let before = rows(&b);
        let resolution = resolve(&mut b, Direction::Left);

        assert_eq!(rows(&b), before);
        assert!(!resolution.moved());
        assert_eq!(resolution.passes(), 1);
    }

    #[test]
    fn test_survivor_is_locked() {
        let mut b = board(&[[2, 2, 0, 0]]);
        let survivor = b.get(Cell::new(0, 0)).unwrap().id;
        let absorbed = b.get(Cell::new(0, 1)).unwrap().id;

        let mut resolution = Resolution::new(Direction::Left);
        let mut merges = Vec::new();
        while !resolution.is_settled() {
            merges.extend(resolution.run_pass(&mut b).unwrap().merges);
        }

        assert_eq!(merges, vec![Merge { survivor, absorbed, cell: Cell::new(0, 0), value: 4 }]);
        assert!(resolution.is_locked(survivor));
        assert!(!resolution.is_locked(absorbed));
    }

    #[test]
    fn test_animation_step_count() {
        // One cell = 200px at 20px per pass: 9 steps to touch, 1 pass to merge,
        // 1 still pass to settle.
        let mut b = board(&[[2, 2, 0, 0]]);
        let resolution = resolve(&mut b, Direction::Left);
        assert_eq!(resolution.passes(), 11);
    }

    #[test]
    fn test_intermediate_positions() {
        let mut b = board(&[[0, 0, 0, 2]]);
        let mut resolution = Resolution::new(Direction::Left);

        resolution.run_pass(&mut b).unwrap();
        let tile = *b.tiles().next().unwrap();
        assert_eq!(tile.x, 580);
        assert_eq!(tile.cell, Cell::new(0, 3));

        for _ in 0..9 {
            resolution.run_pass(&mut b).unwrap();
        }
        let tile = *b.tiles().next().unwrap();
        assert_eq!(tile.x, 400);
        assert_eq!(tile.cell, Cell::new(0, 2));
    }

    #[test]
    fn test_left_from_unaligned_position_settles_in_column_zero() {
        let geometry = Geometry::default();
        let mut b = Board::new(geometry);
        let mut tile = b.place(Cell::new(0, 1), 2).unwrap();
        tile.x = 37;
        Direction::Left.rule().settle(&mut tile, &geometry);
        assert_eq!(tile.cell, Cell::new(0, 1));
        b.rebuild_from([tile]).unwrap();

        resolve(&mut b, Direction::Left);

        let settled = b.tiles().next().unwrap();
        assert_eq!(settled.cell, Cell::new(0, 0));
        assert_eq!((settled.x, settled.y), (0, 0));
    }

    #[test]
    fn test_right_from_unaligned_position_rounds_down() {
        let geometry = Geometry::default();
        let mut b = Board::new(geometry);
        let mut tile = b.place(Cell::new(0, 0), 2).unwrap();
        tile.x = 163;
        b.rebuild_from([tile]).unwrap();

        let mut resolution = Resolution::new(Direction::Right);
        resolution.run_pass(&mut b).unwrap();
        let stepped = b.tiles().next().unwrap();
        assert_eq!(stepped.x, 183);
        assert_eq!(stepped.cell, Cell::new(0, 0));

        resolution.run_to_completion(&mut b).unwrap();
        assert_eq!(b.tiles().next().unwrap().cell, Cell::new(0, 3));
    }

    #[test]
    fn test_full_stuck_board_does_not_move() {
        let mut b = board(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        for direction in Direction::ALL {
            let resolution = resolve(&mut b, direction);
            assert!(!resolution.moved());
            assert_eq!(b.len(), 16);
        }
    }

    #[test]
    fn test_settled_resolution_is_inert() {
        let mut b = board(&[[2, 0, 0, 0]]);
        let mut resolution = Resolution::new(Direction::Right);
        resolution.run_to_completion(&mut b).unwrap();
        let passes = resolution.passes();

        assert_eq!(resolution.run_pass(&mut b).unwrap(), PassReport::default());
        assert_eq!(resolution.passes(), passes);
    }
}
