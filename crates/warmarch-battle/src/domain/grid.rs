//! The deployment grid.
//!
//! Three ranks by three columns of unique-occupancy cells, plus two
//! unbounded lists (reserve and not-deployed). Every unit in a battle is in
//! exactly one location; deployment vacates the old slot and occupies the
//! new one atomically, and only if the target cell is free.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grid rank, front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// Front rank.
    Vanguard,
    /// Middle rank.
    Center,
    /// Back rank.
    Rear,
}

impl Rank {
    /// All ranks, front to back.
    pub const ALL: [Self; 3] = [Self::Vanguard, Self::Center, Self::Rear];

    const fn index(self) -> usize {
        match self {
            Self::Vanguard => 0,
            Self::Center => 1,
            Self::Rear => 2,
        }
    }
}

/// Grid column, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Left column.
    Left,
    /// Center column.
    Center,
    /// Right column.
    Right,
}

impl Column {
    /// All columns, left to right.
    pub const ALL: [Self; 3] = [Self::Left, Self::Center, Self::Right];

    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

/// Where a unit stands. A structured cell always carries both coordinates,
/// so "column required unless in reserve/not-deployed" holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// A structured grid cell.
    Cell {
        /// The rank.
        rank: Rank,
        /// The column.
        column: Column,
    },
    /// The reserve list.
    Reserve,
    /// Present in the battle but not yet deployed.
    NotDeployed,
}

/// The battle grid: 9 unique-occupancy cells plus the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<Uuid>; 3]; 3],
    /// Units held in reserve.
    pub reserve: Vec<Uuid>,
    /// Units not yet deployed.
    pub not_deployed: Vec<Uuid>,
}

impl Grid {
    /// The occupant of a structured cell, if any.
    #[must_use]
    pub const fn cell(&self, rank: Rank, column: Column) -> Option<Uuid> {
        self.cells[rank.index()][column.index()]
    }

    /// Whether `position` can take `unit` — structured cells hold at most
    /// one unit, the lists are unbounded.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        match position {
            Position::Cell { rank, column } => self.cell(rank, column).is_none(),
            Position::Reserve | Position::NotDeployed => true,
        }
    }

    /// Removes `unit_id` from `position`. Tolerates a unit that is not
    /// actually there.
    pub(crate) fn vacate(&mut self, unit_id: Uuid, position: Position) {
        match position {
            Position::Cell { rank, column } => {
                let cell = &mut self.cells[rank.index()][column.index()];
                if *cell == Some(unit_id) {
                    *cell = None;
                }
            }
            Position::Reserve => self.reserve.retain(|id| *id != unit_id),
            Position::NotDeployed => self.not_deployed.retain(|id| *id != unit_id),
        }
    }

    /// Places `unit_id` at `position`. The caller has already checked the
    /// target is free.
    pub(crate) fn occupy(&mut self, unit_id: Uuid, position: Position) {
        match position {
            Position::Cell { rank, column } => {
                self.cells[rank.index()][column.index()] = Some(unit_id);
            }
            Position::Reserve => self.reserve.push(unit_id),
            Position::NotDeployed => self.not_deployed.push(unit_id),
        }
    }

    /// Every location the unit currently occupies (for invariant checks;
    /// always 0 or 1 in a consistent battle).
    #[must_use]
    pub fn locations_of(&self, unit_id: Uuid) -> Vec<Position> {
        let mut found = Vec::new();
        for rank in Rank::ALL {
            for column in Column::ALL {
                if self.cell(rank, column) == Some(unit_id) {
                    found.push(Position::Cell { rank, column });
                }
            }
        }
        if self.reserve.contains(&unit_id) {
            found.push(Position::Reserve);
        }
        if self.not_deployed.contains(&unit_id) {
            found.push(Position::NotDeployed);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        for rank in Rank::ALL {
            for column in Column::ALL {
                assert_eq!(grid.cell(rank, column), None);
            }
        }
        assert!(grid.reserve.is_empty());
        assert!(grid.not_deployed.is_empty());
    }

    #[test]
    fn test_occupy_and_vacate_cell() {
        let unit = Uuid::new_v4();
        let position = Position::Cell {
            rank: Rank::Vanguard,
            column: Column::Left,
        };
        let mut grid = Grid::default();

        grid.occupy(unit, position);
        assert_eq!(grid.cell(Rank::Vanguard, Column::Left), Some(unit));
        assert!(!grid.is_free(position));

        grid.vacate(unit, position);
        assert_eq!(grid.cell(Rank::Vanguard, Column::Left), None);
    }

    #[test]
    fn test_vacate_does_not_evict_a_different_unit() {
        let occupant = Uuid::new_v4();
        let other = Uuid::new_v4();
        let position = Position::Cell {
            rank: Rank::Rear,
            column: Column::Right,
        };
        let mut grid = Grid::default();
        grid.occupy(occupant, position);

        grid.vacate(other, position);
        assert_eq!(grid.cell(Rank::Rear, Column::Right), Some(occupant));
    }

    #[test]
    fn test_lists_are_unbounded() {
        let mut grid = Grid::default();
        let units: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for &unit in &units {
            grid.occupy(unit, Position::Reserve);
        }
        assert_eq!(grid.reserve, units);
        assert!(grid.is_free(Position::Reserve));
    }

    #[test]
    fn test_locations_of_tracks_single_position() {
        let unit = Uuid::new_v4();
        let mut grid = Grid::default();
        grid.occupy(unit, Position::NotDeployed);
        assert_eq!(grid.locations_of(unit), vec![Position::NotDeployed]);

        grid.vacate(unit, Position::NotDeployed);
        grid.occupy(
            unit,
            Position::Cell {
                rank: Rank::Center,
                column: Column::Center,
            },
        );
        assert_eq!(grid.locations_of(unit).len(), 1);
    }
}
