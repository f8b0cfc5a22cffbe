//! Synthetic records with known analytic answers, for demos and tests.

use crate::field::Field2;
use crate::record::PivRecord;

/// Record on a uniform `(ny, nx)` grid with step `h`, velocity from `vel(x, y)`
/// and a flat interface at `interface_y`.
pub fn record_from_fn(
    ny: usize,
    nx: usize,
    h: f64,
    interface_y: f64,
    vel: impl Fn(f64, f64) -> (f64, f64),
) -> PivRecord {
    let mut rec = PivRecord::default();
    rec.insert("x", Field2::from_fn(ny, nx, |_, col| col as f64 * h));
    rec.insert("y", Field2::from_fn(ny, nx, |row, _| row as f64 * h));
    rec.insert("u", Field2::from_fn(ny, nx, |row, col| vel(col as f64 * h, row as f64 * h).0));
    rec.insert("v", Field2::from_fn(ny, nx, |row, col| vel(col as f64 * h, row as f64 * h).1));
    rec.insert("xit", Field2::from_fn(1, nx, |_, col| col as f64 * h));
    rec.insert("yit", Field2::filled(1, nx, interface_y));
    rec
}

/// Solid-body rotation `u = −ωy, v = ωx`: curl 2ω, divergence 0.
pub fn solid_body_record(ny: usize, nx: usize, h: f64, omega: f64, interface_y: f64) -> PivRecord {
    record_from_fn(ny, nx, h, interface_y, |x, y| (-omega * y, omega * x))
}
