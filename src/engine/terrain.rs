// Terrain heightfield: ground elevation lookup for the character

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::core::math::clamp;

/// Errors raised while loading terrain data. Fatal at startup; the height
/// query itself has no failure modes.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read terrain file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed terrain data: {0}")]
    Parse(String),
}

/// A regular grid of height samples centered on the origin.
///
/// Static for the process lifetime; the character queries it every tick at
/// its current ground position.
#[derive(Debug, Clone)]
pub struct Terrain {
    heights: Vec<f32>,
    columns: usize,
    rows: usize,
    /// World units between adjacent samples
    spacing: f32,
}

impl Terrain {
    /// Build a terrain from row-major height samples
    pub fn from_grid(
        columns: usize,
        rows: usize,
        spacing: f32,
        heights: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        if columns < 2 || rows < 2 {
            return Err(TerrainError::Parse(format!(
                "grid must be at least 2x2, got {columns}x{rows}"
            )));
        }
        if spacing <= 0.0 {
            return Err(TerrainError::Parse(format!(
                "sample spacing must be positive, got {spacing}"
            )));
        }
        if heights.len() != columns * rows {
            return Err(TerrainError::Parse(format!(
                "expected {} height samples for a {columns}x{rows} grid, got {}",
                columns * rows,
                heights.len()
            )));
        }

        Ok(Self {
            heights,
            columns,
            rows,
            spacing,
        })
    }

    /// Flat terrain at height zero (useful for tests and missing data)
    pub fn flat(columns: usize, rows: usize, spacing: f32) -> Self {
        Self::from_grid(columns, rows, spacing, vec![0.0; columns * rows])
            .expect("flat grid dimensions are valid")
    }

    /// Load a terrain from a text heightfield: a `columns rows` header line
    /// followed by row-major height samples separated by whitespace
    pub fn load(path: &Path, spacing: f32) -> Result<Self, TerrainError> {
        let source = fs::read_to_string(path).map_err(|source| TerrainError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut tokens = source.split_whitespace();
        let columns: usize = tokens
            .next()
            .ok_or_else(|| TerrainError::Parse("missing column count".to_string()))?
            .parse()
            .map_err(|_| TerrainError::Parse("invalid column count".to_string()))?;
        let rows: usize = tokens
            .next()
            .ok_or_else(|| TerrainError::Parse("missing row count".to_string()))?
            .parse()
            .map_err(|_| TerrainError::Parse("invalid row count".to_string()))?;

        let heights = tokens
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| TerrainError::Parse(format!("invalid height sample '{token}'")))
            })
            .collect::<Result<Vec<f32>, TerrainError>>()?;

        let terrain = Self::from_grid(columns, rows, spacing, heights)?;
        info!(
            "loaded terrain '{}': {columns}x{rows} samples at {spacing} spacing",
            path.display()
        );
        Ok(terrain)
    }

    /// Ground height at a world position, bilinearly interpolated.
    ///
    /// Positions outside the grid clamp to the border, so the query always
    /// returns a defined value.
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        let max_col = (self.columns - 1) as f32;
        let max_row = (self.rows - 1) as f32;

        // Grid coordinates, with the grid centered on the world origin
        let gx = clamp(x / self.spacing + max_col / 2.0, 0.0, max_col);
        let gy = clamp(y / self.spacing + max_row / 2.0, 0.0, max_row);

        let col0 = gx.floor() as usize;
        let row0 = gy.floor() as usize;
        let col1 = (col0 + 1).min(self.columns - 1);
        let row1 = (row0 + 1).min(self.rows - 1);
        let tx = gx - col0 as f32;
        let ty = gy - row0 as f32;

        let h00 = self.heights[row0 * self.columns + col0];
        let h10 = self.heights[row0 * self.columns + col1];
        let h01 = self.heights[row1 * self.columns + col0];
        let h11 = self.heights[row1 * self.columns + col1];

        let bottom = h00 + (h10 - h00) * tx;
        let top = h01 + (h11 - h01) * tx;
        bottom + (top - bottom) * ty
    }

}
