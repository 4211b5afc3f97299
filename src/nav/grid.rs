//! Grid-based navigation provider
//!
//! A* over a walkability grid on the ground plane. Stands in for an engine
//! navigation mesh in the demo and in tests; cells map to world-space
//! squares and routes come back as corner points at ground height.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::NavQuery;

/// Walkability grid on the ground plane (x/z axes).
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Width in cells (x axis).
    pub width: usize,
    /// Depth in cells (z axis).
    pub depth: usize,
    /// Cell size in world units.
    pub cell_size: f32,
    /// World-space x/z of the grid's corner cell.
    pub origin: Vec3,
    /// Ground height routes are emitted at.
    pub ground_y: f32,
    cells: Vec<bool>,
}

impl NavGrid {
    /// Create a grid with every cell walkable.
    #[must_use]
    pub fn new(width: usize, depth: usize, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
            origin: Vec3::ZERO,
            ground_y: 0.0,
            cells: vec![true; width * depth],
        }
    }

    /// Mark a cell walkable or blocked.
    pub fn set_walkable(&mut self, x: usize, z: usize, walkable: bool) {
        if x < self.width && z < self.depth {
            self.cells[z * self.width + x] = walkable;
        }
    }

    /// Whether a cell can be routed through. Out-of-bounds cells cannot.
    #[must_use]
    pub fn is_walkable(&self, x: usize, z: usize) -> bool {
        x < self.width && z < self.depth && self.cells[z * self.width + x]
    }

    /// Cell under a world position.
    #[must_use]
    pub fn world_to_cell(&self, position: Vec3) -> (i32, i32) {
        let local = position - self.origin;
        (
            (local.x / self.cell_size).floor() as i32,
            (local.z / self.cell_size).floor() as i32,
        )
    }

    /// World position at the center of a cell.
    #[must_use]
    pub fn cell_to_world(&self, x: usize, z: usize) -> Vec3 {
        self.origin
            + Vec3::new(
                (x as f32 + 0.5) * self.cell_size,
                self.ground_y,
                (z as f32 + 0.5) * self.cell_size,
            )
    }

    fn neighbors(&self, x: usize, z: usize, out: &mut Vec<(usize, usize)>) {
        out.clear();
        if x > 0 && self.is_walkable(x - 1, z) {
            out.push((x - 1, z));
        }
        if self.is_walkable(x + 1, z) {
            out.push((x + 1, z));
        }
        if z > 0 && self.is_walkable(x, z - 1) {
            out.push((x, z - 1));
        }
        if self.is_walkable(x, z + 1) {
            out.push((x, z + 1));
        }
    }

    /// A* route between two world positions, as cell-center corners.
    ///
    /// `None` when either endpoint is off the grid or blocked, or no route
    /// connects them.
    #[must_use]
    pub fn find_route(&self, start: Vec3, goal: Vec3) -> Option<Vec<Vec3>> {
        let (sx, sz) = self.world_to_cell(start);
        let (gx, gz) = self.world_to_cell(goal);
        if sx < 0 || sz < 0 || gx < 0 || gz < 0 {
            return None;
        }
        let (sx, sz) = (sx as usize, sz as usize);
        let (gx, gz) = (gx as usize, gz as usize);
        if !self.is_walkable(sx, sz) || !self.is_walkable(gx, gz) {
            return None;
        }

        let heuristic = |x: usize, z: usize| -> f32 {
            (x as f32 - gx as f32).abs() + (z as f32 - gz as f32).abs()
        };

        let mut open = BinaryHeap::new();
        let mut came_from: FxHashMap<(usize, usize), (usize, usize)> = FxHashMap::default();
        let mut g_score: FxHashMap<(usize, usize), f32> = FxHashMap::default();
        let mut scratch = Vec::with_capacity(4);

        g_score.insert((sx, sz), 0.0);
        open.push(Node {
            x: sx,
            z: sz,
            f_cost: heuristic(sx, sz),
        });

        while let Some(current) = open.pop() {
            if current.x == gx && current.z == gz {
                let mut cells = vec![(gx, gz)];
                let mut cursor = (gx, gz);
                while let Some(&prev) = came_from.get(&cursor) {
                    cells.push(prev);
                    cursor = prev;
                }
                cells.reverse();
                return Some(
                    cells
                        .into_iter()
                        .map(|(x, z)| self.cell_to_world(x, z))
                        .collect(),
                );
            }

            let current_g = *g_score.get(&(current.x, current.z)).unwrap_or(&f32::MAX);
            self.neighbors(current.x, current.z, &mut scratch);
            for &(nx, nz) in &scratch {
                let tentative = current_g + 1.0;
                if tentative < *g_score.get(&(nx, nz)).unwrap_or(&f32::MAX) {
                    came_from.insert((nx, nz), (current.x, current.z));
                    g_score.insert((nx, nz), tentative);
                    open.push(Node {
                        x: nx,
                        z: nz,
                        f_cost: tentative + heuristic(nx, nz),
                    });
                }
            }
        }

        None
    }
}

/// A* frontier entry ordered as a min-heap on f-cost.
#[derive(Debug, Clone, Copy)]
struct Node {
    x: usize,
    z: usize,
    f_cost: f32,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.z == other.z
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// [`NavQuery`] provider that plans on a [`NavGrid`].
///
/// Planning is synchronous, so `route_pending` is only true inside a
/// request; it exists because the trait models providers that plan
/// asynchronously.
#[derive(Debug, Clone)]
pub struct GridNavigator {
    grid: NavGrid,
    route: Vec<Vec3>,
    corner: usize,
    destination: Option<Vec3>,
}

impl GridNavigator {
    /// Corner within this horizontal distance counts as passed.
    const CORNER_TOLERANCE: f32 = 0.25;

    /// Create a navigator over the given grid.
    #[must_use]
    pub fn new(grid: NavGrid) -> Self {
        Self {
            grid,
            route: Vec::new(),
            corner: 0,
            destination: None,
        }
    }

    /// The underlying grid.
    #[must_use]
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }
}

impl NavQuery for GridNavigator {
    fn request_destination(&mut self, from: Vec3, destination: Vec3) -> bool {
        self.route.clear();
        self.corner = 0;
        self.destination = None;

        let Some(route) = self.grid.find_route(from, destination) else {
            return false;
        };

        self.route = route;
        self.destination = Some(destination);
        true
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn route_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self, position: Vec3) -> f32 {
        let Some(destination) = self.destination else {
            return f32::INFINITY;
        };
        let cursor = Vec3::new(position.x, self.grid.ground_y, position.z);
        if self.corner >= self.route.len() {
            // Every corner consumed; what is left is the straight shot to
            // the destination itself.
            let mut delta = destination - cursor;
            delta.y = 0.0;
            return delta.length();
        }
        let mut remaining = 0.0;
        let mut cursor = cursor;
        for corner in &self.route[self.corner..] {
            remaining += cursor.distance(*corner);
            cursor = *corner;
        }
        remaining
    }

    fn direction_from(&mut self, position: Vec3) -> Option<Vec3> {
        while self.corner < self.route.len() {
            let target = self.route[self.corner];
            let mut delta = target - position;
            delta.y = 0.0;
            if delta.length() <= Self::CORNER_TOLERANCE {
                self.corner += 1;
                continue;
            }
            return Some(delta.normalize());
        }
        None
    }

    fn reset(&mut self) {
        self.route.clear();
        self.corner = 0;
        self.destination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_detours_around_wall() {
        let mut grid = NavGrid::new(10, 10, 1.0);
        for z in 2..8 {
            grid.set_walkable(5, z, false);
        }

        let route = grid
            .find_route(Vec3::new(2.5, 0.0, 5.5), Vec3::new(8.5, 0.0, 5.5))
            .expect("route should exist around the wall");
        // More corners than the straight line would need.
        assert!(route.len() > 7);
    }

    #[test]
    fn test_direct_route() {
        let grid = NavGrid::new(10, 10, 1.0);
        let route = grid
            .find_route(Vec3::new(0.5, 0.0, 0.5), Vec3::new(3.5, 0.0, 0.5))
            .expect("open grid always routes");
        assert_eq!(route.len(), 4);
    }

    #[test]
    fn test_unreachable_goal_is_none() {
        let mut grid = NavGrid::new(5, 5, 1.0);
        // Wall the goal cell in completely.
        grid.set_walkable(3, 2, false);
        grid.set_walkable(3, 4, false);
        grid.set_walkable(2, 3, false);
        grid.set_walkable(4, 3, false);

        assert!(
            grid.find_route(Vec3::new(0.5, 0.0, 0.5), Vec3::new(3.5, 0.0, 3.5))
                .is_none()
        );
    }

    #[test]
    fn test_off_grid_endpoints_rejected() {
        let grid = NavGrid::new(4, 4, 1.0);
        assert!(
            grid.find_route(Vec3::new(-3.0, 0.0, 0.5), Vec3::new(1.5, 0.0, 1.5))
                .is_none()
        );
        assert!(
            grid.find_route(Vec3::new(0.5, 0.0, 0.5), Vec3::new(40.0, 0.0, 1.5))
                .is_none()
        );
    }

    #[test]
    fn test_navigator_follows_route_to_destination() {
        let navigator = GridNavigator::new(NavGrid::new(10, 10, 1.0));
        let mut navigator = navigator;
        let start = Vec3::new(0.5, 0.0, 0.5);
        let goal = Vec3::new(7.5, 0.0, 0.5);

        assert!(navigator.request_destination(start, goal));
        assert_eq!(navigator.destination(), Some(goal));

        // Walk the route; remaining distance shrinks monotonically.
        let mut position = start;
        let mut last_remaining = navigator.remaining_distance(position);
        for _ in 0..200 {
            let Some(direction) = navigator.direction_from(position) else {
                break;
            };
            position += direction * 0.1;
            let remaining = navigator.remaining_distance(position);
            assert!(remaining <= last_remaining + 0.11);
            last_remaining = remaining;
        }
        assert!(position.distance(goal) < 1.0);
    }

    #[test]
    fn test_failed_request_drops_route() {
        let mut grid = NavGrid::new(5, 5, 1.0);
        grid.set_walkable(3, 3, false);
        let mut navigator = GridNavigator::new(grid);

        let start = Vec3::new(0.5, 0.0, 0.5);
        assert!(navigator.request_destination(start, Vec3::new(4.5, 0.0, 4.5)));
        assert!(navigator.destination().is_some());

        // A request into a blocked cell fails and clears what was there.
        assert!(!navigator.request_destination(start, Vec3::new(3.5, 0.0, 3.5)));
        assert!(navigator.destination().is_none());
        assert!(navigator.direction_from(start).is_none());
        assert!(navigator.remaining_distance(start).is_infinite());
    }
}
