use serde::{Deserialize, Serialize};

use crate::error::{AtmosphereError, Result};

/// Row-major `width x height` matrix indexed by `(x, y)`.
///
/// Deserialization goes through [`Grid::from_vec`], so a decoded grid always
/// holds exactly `width * height` cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

#[derive(Deserialize)]
struct RawGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = AtmosphereError;

    fn try_from(raw: RawGrid<T>) -> Result<Self> {
        Grid::from_vec(raw.width, raw.height, raw.cells)
    }
}

impl<T: Clone> Grid<T> {
    /// Build a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        ensure_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![value; width * height],
        })
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        ensure_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Wrap an existing row-major vector.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self> {
        ensure_dimensions(width, height)?;
        let expected = width * height;
        if cells.len() != expected {
            return Err(AtmosphereError::CellCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of bounds for {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Map signed coordinates to a cell index, or `None` outside the grid.
    /// Edges clip; there is no wraparound.
    #[inline]
    pub fn checked_offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let index = self.offset(x, y);
        self.cells[index] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate `(x, y, &cell)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index % width, index / width, cell))
    }

    /// Fail with [`AtmosphereError::ShapeMismatch`] unless `self` has `expected` shape.
    pub fn ensure_shape(&self, field: &'static str, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(AtmosphereError::ShapeMismatch {
                field,
                expected,
                actual: self.shape(),
            });
        }
        Ok(())
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.cells[self.offset(x, y)]
    }
}

fn ensure_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AtmosphereError::EmptyGrid { width, height });
    }
    Ok(())
}
