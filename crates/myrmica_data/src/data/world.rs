use super::agent::ColonyId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grid coordinate of a cell or an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn dist(&self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// The four macro-actions an agent can take in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroAction {
    /// Stay put, do nothing.
    Hold,
    /// Move toward food and gather.
    Forage,
    /// Head home and deposit cargo.
    Return,
    /// Reinforce the trail at the current cell.
    Pheromone,
}

impl MacroAction {
    pub const ALL: [MacroAction; 4] = [
        MacroAction::Hold,
        MacroAction::Forage,
        MacroAction::Return,
        MacroAction::Pheromone,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MacroAction::Hold => "hold",
            MacroAction::Forage => "forage",
            MacroAction::Return => "return",
            MacroAction::Pheromone => "pheromone",
        }
    }
}

/// One cell of the world grid.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cell {
    pub food: f64,
    pub pheromone: f64,
    /// Which colony, if any, has its home on this cell.
    pub home_owner: Option<ColonyId>,
}

/// Read-only view of the world handed to the decision pipeline each tick.
///
/// The pipeline never mutates the world; the harness that executes the chosen
/// action does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    pub max_food: f64,
    pub max_pheromone: f64,
    /// Home location per colony.
    pub homes: HashMap<ColonyId, Position>,
    /// Colony reserve (food stored at the home).
    pub reserves: HashMap<ColonyId, f64>,
    /// The queen's initial store; the ceiling for reserve normalization.
    pub queen_initial_reserve: f64,
}

impl WorldSnapshot {
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }

    /// Cell at (x, y); out-of-bounds coordinates yield an empty cell.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width as usize + x as usize]
        } else {
            Cell::default()
        }
    }

    /// In-bounds 8-neighborhood of a position (self excluded).
    #[must_use]
    pub fn neighbors8(&self, pos: Position) -> Vec<Position> {
        let mut out = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (pos.x + dx, pos.y + dy);
                if self.in_bounds(nx, ny) {
                    out.push(Position::new(nx, ny));
                }
            }
        }
        out
    }

    /// Length of the grid diagonal, the normalizer for all distances.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        (w * w + h * h).sqrt()
    }

    #[must_use]
    pub fn home_of(&self, colony: ColonyId) -> Option<Position> {
        self.homes.get(&colony).copied()
    }

    /// Home of the nearest rival colony, if any rival has one.
    #[must_use]
    pub fn enemy_home_of(&self, colony: ColonyId, from: Position) -> Option<Position> {
        self.homes
            .iter()
            .filter(|(id, _)| **id != colony)
            .map(|(_, pos)| *pos)
            .min_by(|a, b| from.dist(*a).total_cmp(&from.dist(*b)))
    }

    #[must_use]
    pub fn reserve_of(&self, colony: ColonyId) -> f64 {
        self.reserves.get(&colony).copied().unwrap_or(0.0)
    }
}
