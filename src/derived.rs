use crate::field::Field2;
use crate::grid::Grid;

/// ∂f/∂x along columns with step `dx`.
/// Central differences inside, one-sided first-order at the first and last column.
pub fn gradient_x(f: &Field2, dx: f64) -> Field2 {
    let (ny, nx) = f.shape();
    let mut out = Field2::filled(ny, nx, 0.0);
    if nx < 2 {
        return out;
    }
    let inv_2h = 0.5 / dx;
    for row in 0..ny {
        out.set(row, 0, (f.at(row, 1) - f.at(row, 0)) / dx);
        for col in 1..(nx - 1) {
            out.set(row, col, (f.at(row, col + 1) - f.at(row, col - 1)) * inv_2h);
        }
        out.set(row, nx - 1, (f.at(row, nx - 1) - f.at(row, nx - 2)) / dx);
    }
    out
}

/// ∂f/∂y along rows with step `dy`, same scheme as [`gradient_x`].
pub fn gradient_y(f: &Field2, dy: f64) -> Field2 {
    let (ny, nx) = f.shape();
    let mut out = Field2::filled(ny, nx, 0.0);
    if ny < 2 {
        return out;
    }
    let inv_2h = 0.5 / dy;
    for col in 0..nx {
        out.set(0, col, (f.at(1, col) - f.at(0, col)) / dy);
        for row in 1..(ny - 1) {
            out.set(row, col, (f.at(row + 1, col) - f.at(row - 1, col)) * inv_2h);
        }
        out.set(ny - 1, col, (f.at(ny - 1, col) - f.at(ny - 2, col)) / dy);
    }
    out
}

/// ∇·v = ∂u/∂x + ∂v/∂y
pub fn divergence(grid: &Grid) -> Field2 {
    let dudx = gradient_x(grid.u(), grid.dx());
    let dvdy = gradient_y(grid.v(), grid.dy());
    dudx.zip_map(&dvdy, |a, b| a + b)
}

/// z-component of ∇×v: ∂v/∂x − ∂u/∂y
pub fn curl(grid: &Grid) -> Field2 {
    let dvdx = gradient_x(grid.v(), grid.dx());
    let dudy = gradient_y(grid.u(), grid.dy());
    dvdx.zip_map(&dudy, |a, b| a - b)
}

/// Which derived quantity to produce; lets callers pick by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Speed,
    Divergence,
    Curl,
    U,
    V,
}

impl Quantity {
    pub fn compute(self, grid: &Grid) -> Field2 {
        match self {
            Quantity::Speed => grid.speed(),
            Quantity::Divergence => divergence(grid),
            Quantity::Curl => curl(grid),
            Quantity::U => grid.u().clone(),
            Quantity::V => grid.v().clone(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quantity::Speed => "speed [m/s]",
            Quantity::Divergence => "divergence [1/s]",
            Quantity::Curl => "curl_z [1/s]",
            Quantity::U => "u [mm/s]",
            Quantity::V => "v [mm/s]",
        }
    }
}
