/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for neighbor lookups in 3D.
 * It divides the bounding cube into cells at least one perception radius wide,
 * so every neighbor of a boid lives in the 3x3x3 block of cells around it.
 *
 * Positions outside the cube (y is not wrapped) are clamped into the border
 * cells. Clamping never moves two points further apart in cell space, so the
 * 3x3x3 block still covers every neighbor within the radius.
 */

use nannou::prelude::*;

// Upper bound on cells per axis. Wider cells still cover every neighbor.
pub const MAX_GRID_CELLS_PER_AXIS: usize = 64;

pub struct SpatialGrid {
    pub cell_size: f32,
    pub grid_size: usize,
    half_extent: f32,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(min_cell_size: f32, half_extent: f32) -> Self {
        let world_size = half_extent * 2.0;
        let grid_size = ((world_size / min_cell_size).floor() as usize)
            .clamp(1, MAX_GRID_CELLS_PER_AXIS);
        // Stretch cells so they tile the cube exactly and never shrink below the radius
        let cell_size = world_size / grid_size as f32;

        let mut cells = Vec::with_capacity(grid_size * grid_size * grid_size);
        cells.resize_with(grid_size * grid_size * grid_size, Vec::new);

        Self {
            cell_size,
            grid_size,
            half_extent,
            cells,
        }
    }

    // Cell coordinate along one axis, clamped into the grid
    #[inline]
    fn axis_cell(&self, value: f32) -> usize {
        let cell = ((value + self.half_extent) / self.cell_size).floor();
        cell.clamp(0.0, (self.grid_size - 1) as f32) as usize
    }

    #[inline]
    fn cell_coords(&self, position: Point3) -> (usize, usize, usize) {
        (
            self.axis_cell(position.x),
            self.axis_cell(position.y),
            self.axis_cell(position.z),
        )
    }

    #[inline]
    fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.grid_size + y) * self.grid_size + x
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, boid_index: usize, position: Point3) {
        let (x, y, z) = self.cell_coords(position);
        let cell_index = self.cell_index(x, y, z);
        self.cells[cell_index].push(boid_index);
    }

    // Move a boid between cells after it has been integrated
    pub fn relocate(&mut self, boid_index: usize, from: Point3, to: Point3) {
        let (fx, fy, fz) = self.cell_coords(from);
        let (tx, ty, tz) = self.cell_coords(to);
        let old_cell = self.cell_index(fx, fy, fz);
        let new_cell = self.cell_index(tx, ty, tz);
        if old_cell == new_cell {
            return;
        }

        if let Some(slot) = self.cells[old_cell].iter().position(|&i| i == boid_index) {
            self.cells[old_cell].swap_remove(slot);
        }
        self.cells[new_cell].push(boid_index);
    }

    // Clear the grid and insert every position by index
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Point3>) {
        self.clear();
        for (i, position) in positions.into_iter().enumerate() {
            self.insert(i, position);
        }
    }

    // Indices in the cell containing `position` and its 26 neighbors, appended to `out`
    pub fn nearby_indices(&self, position: Point3, out: &mut Vec<usize>) {
        let (cx, cy, cz) = self.cell_coords(position);
        let last = self.grid_size - 1;

        for z in cz.saturating_sub(1)..=(cz + 1).min(last) {
            for y in cy.saturating_sub(1)..=(cy + 1).min(last) {
                for x in cx.saturating_sub(1)..=(cx + 1).min(last) {
                    out.extend_from_slice(&self.cells[self.cell_index(x, y, z)]);
                }
            }
        }
    }
}
