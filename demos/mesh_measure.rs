use eyre::eyre;
use q1map::cell::{CellKey, HypercubeCell, MappingCell, MeshId};
use q1map::integrate::{measure, par_integrate_scalar};
use q1map::mapping::{InverseMappingSettings, Mapping, MappingQ1};
use q1map::nalgebra::{Point2, U2};
use q1map::quadrature::tensor::quadrilateral_gauss;
use std::f64::consts::PI;

/// Cells of a quarter annulus with radii `r0 < r1`, `n_radial x n_angular` cells.
fn quarter_annulus(r0: f64, r1: f64, n_radial: usize, n_angular: usize) -> eyre::Result<Vec<HypercubeCell<f64, U2>>> {
    let mesh = MeshId::unique();
    let point = |i: usize, j: usize| {
        let r = r0 + (r1 - r0) * i as f64 / n_radial as f64;
        let theta = 0.5 * PI * j as f64 / n_angular as f64;
        Point2::new(r * theta.cos(), r * theta.sin())
    };

    let mut cells = Vec::with_capacity(n_radial * n_angular);
    for j in 0..n_angular {
        for i in 0..n_radial {
            let vertices = vec![point(i, j), point(i + 1, j), point(i, j + 1), point(i + 1, j + 1)];
            cells.push(HypercubeCell::from_vertices(CellKey::new(mesh, cells.len()), vertices)?);
        }
    }
    Ok(cells)
}

fn main() -> eyre::Result<()> {
    let settings: InverseMappingSettings =
        serde_json::from_str(r#"{ "max_iterations": 10, "tolerance_factor": 1e-15 }"#)?;

    let mapping = MappingQ1;
    let quadrature = quadrilateral_gauss::<f64>(2);
    let (r0, r1) = (1.0, 2.0);

    for n in [2, 4, 8, 16, 32] {
        let cells = quarter_annulus(r0, r1, n, n)?;
        let area = measure(&mapping, &cells, &quadrature)?;
        let exact = 0.25 * PI * (r1 * r1 - r0 * r0);
        // Integral of |x|^2, i.e. the polar moment of inertia
        let moment = par_integrate_scalar(&mapping, &cells, &quadrature, |x| x.coords.norm_squared())?;
        let exact_moment = 0.125 * PI * (r1.powi(4) - r0.powi(4));
        println!(
            "n = {:2}: area = {:.10} (error {:.3e}), polar moment = {:.10} (error {:.3e})",
            n,
            area,
            (area - exact).abs(),
            moment,
            (moment - exact_moment).abs()
        );
    }

    // Locate a physical point in the coarsest mesh
    let cells = quarter_annulus(r0, r1, 2, 2)?;
    let target = Point2::new(1.2, 0.3);
    for cell in &cells {
        let inverse = mapping.transform_real_to_unit_cell_with(cell, &target, &settings)?;
        let inside = inverse.point.iter().all(|xi| (0.0..=1.0).contains(xi));
        if inside && inverse.residual_norm <= 1e-12 {
            let x = mapping.transform_unit_to_real_cell(cell, &inverse.point)?;
            println!(
                "{} lies in cell {} at reference point {} (mapped back to {}, {} iterations)",
                target,
                cell.key().index,
                inverse.point,
                x,
                inverse.iterations
            );
            return Ok(());
        }
    }
    Err(eyre!("{} does not lie in any cell", target))
}
