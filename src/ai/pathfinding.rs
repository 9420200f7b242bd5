//! A* pathfinding on a grid laid over the XZ plane
//!
//! Produces waypoint lists for `PathFollowing`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use rustc_hash::FxHashMap;

const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// Walkability grid on the XZ plane at a fixed height
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Cells along X
    pub width: usize,
    /// Cells along Z
    pub depth: usize,
    /// Cell size in world units
    pub cell_size: f32,
    /// World position of the grid's minimum corner; its Y is the waypoint height
    pub origin: Vec3,
    cells: Vec<bool>,
}

impl NavGrid {
    /// Create a new grid (all cells walkable by default)
    #[must_use]
    pub fn new(width: usize, depth: usize, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
            origin: Vec3::ZERO,
            cells: vec![true; width * depth],
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn set_walkable(&mut self, x: usize, z: usize, walkable: bool) {
        if x < self.width && z < self.depth {
            self.cells[z * self.width + x] = walkable;
        }
    }

    /// Block every cell whose center lies within `radius` of `center`
    pub fn block_circle(&mut self, center: Vec3, radius: f32) {
        for z in 0..self.depth {
            for x in 0..self.width {
                let cell = self.cell_center(x, z);
                let dx = cell.x - center.x;
                let dz = cell.z - center.z;
                if dx * dx + dz * dz <= radius * radius {
                    self.set_walkable(x, z, false);
                }
            }
        }
    }

    #[must_use]
    pub fn is_walkable(&self, x: usize, z: usize) -> bool {
        x < self.width && z < self.depth && self.cells[z * self.width + x]
    }

    /// Cell containing a world position, `None` outside the grid
    #[must_use]
    pub fn cell_at(&self, position: Vec3) -> Option<(usize, usize)> {
        let local = position - self.origin;
        let x = (local.x / self.cell_size).floor();
        let z = (local.z / self.cell_size).floor();
        if x < 0.0 || z < 0.0 {
            return None;
        }
        let (x, z) = (x as usize, z as usize);
        (x < self.width && z < self.depth).then_some((x, z))
    }

    /// World position of a cell's center
    #[must_use]
    pub fn cell_center(&self, x: usize, z: usize) -> Vec3 {
        self.origin
            + Vec3::new(
                (x as f32 + 0.5) * self.cell_size,
                0.0,
                (z as f32 + 0.5) * self.cell_size,
            )
    }

    /// Walkable neighbors with step cost; diagonals may not cut corners
    fn neighbors(&self, x: usize, z: usize) -> impl Iterator<Item = ((usize, usize), f32)> + '_ {
        const STEPS: [(isize, isize); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];

        STEPS.iter().filter_map(move |&(dx, dz)| {
            let nx = x.checked_add_signed(dx)?;
            let nz = z.checked_add_signed(dz)?;
            if !self.is_walkable(nx, nz) {
                return None;
            }
            if dx != 0 && dz != 0 {
                if !self.is_walkable(nx, z) || !self.is_walkable(x, nz) {
                    return None;
                }
                return Some(((nx, nz), DIAGONAL_COST));
            }
            Some(((nx, nz), 1.0))
        })
    }

    /// Find a path between two world positions.
    ///
    /// Returns an empty path when either end is off the grid or blocked, or
    /// when the goal is unreachable.
    #[must_use]
    pub fn find_path(&self, start: Vec3, goal: Vec3) -> NavPath {
        let (Some(start), Some(goal)) = (self.cell_at(start), self.cell_at(goal)) else {
            return NavPath::default();
        };
        if !self.is_walkable(start.0, start.1) || !self.is_walkable(goal.0, goal.1) {
            return NavPath::default();
        }

        let heuristic = |(x, z): (usize, usize)| -> f32 {
            let dx = x.abs_diff(goal.0) as f32;
            let dz = z.abs_diff(goal.1) as f32;
            // Octile distance
            dx.max(dz) + (DIAGONAL_COST - 1.0) * dx.min(dz)
        };

        let mut open_set = BinaryHeap::new();
        let mut came_from: FxHashMap<(usize, usize), (usize, usize)> = FxHashMap::default();
        let mut g_score: FxHashMap<(usize, usize), f32> = FxHashMap::default();

        g_score.insert(start, 0.0);
        open_set.push(Node {
            cell: start,
            g_cost: 0.0,
            f_cost: heuristic(start),
        });

        while let Some(current) = open_set.pop() {
            if current.cell == goal {
                let mut cells = vec![goal];
                let mut cursor = goal;
                while let Some(&prev) = came_from.get(&cursor) {
                    cells.push(prev);
                    cursor = prev;
                }
                cells.reverse();

                let waypoints: Vec<Vec3> = cells
                    .iter()
                    .map(|&(x, z)| self.cell_center(x, z))
                    .collect();
                return NavPath::new(waypoints);
            }

            // Stale heap entry
            if current.g_cost > g_score.get(&current.cell).copied().unwrap_or(f32::MAX) {
                continue;
            }

            for (next, step) in self.neighbors(current.cell.0, current.cell.1) {
                let tentative = current.g_cost + step;
                if tentative < g_score.get(&next).copied().unwrap_or(f32::MAX) {
                    came_from.insert(next, current.cell);
                    g_score.insert(next, tentative);
                    open_set.push(Node {
                        cell: next,
                        g_cost: tentative,
                        f_cost: tentative + heuristic(next),
                    });
                }
            }
        }

        log::debug!("no path from {start:?} to {goal:?}");
        NavPath::default()
    }
}

/// Waypoints produced by `NavGrid::find_path`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavPath {
    pub waypoints: Vec<Vec3>,
    /// Total polyline length
    pub length: f32,
}

impl NavPath {
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        let length = waypoints.windows(2).map(|w| w[0].distance(w[1])).sum();
        Self { waypoints, length }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Node {
    cell: (usize, usize),
    g_cost: f32,
    f_cost: f32,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other.f_cost.total_cmp(&self.f_cost)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
