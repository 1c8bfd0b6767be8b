//! Uniform Brillouin-zone mesh averages.
//!
//! The mesh has `L` points per dimension at `k_i = -pi + 2 pi i / L`. Planes
//! of constant `kx` are summed on the rayon pool and combined in index
//! order, so results do not depend on thread scheduling.

use mft_model::KPoint;
use rayon::prelude::*;
use std::f64::consts::PI;

pub fn mesh_coord(l: usize, i: usize) -> f64 {
    -PI + 2.0 * PI * (i as f64) / (l as f64)
}

/// Mean of `f` over the `L^3` mesh.
pub fn average<F>(l: usize, f: F) -> f64
where
    F: Fn(&KPoint) -> f64 + Sync,
{
    let [mean] = average_n(l, |k| [f(k)]);
    mean
}

/// Mean of `N` integrands evaluated together at each mesh point.
pub fn average_n<const N: usize, F>(l: usize, f: F) -> [f64; N]
where
    F: Fn(&KPoint) -> [f64; N] + Sync,
{
    if l == 0 {
        return [0.0; N];
    }
    let planes: Vec<[f64; N]> = (0..l)
        .into_par_iter()
        .map(|i| {
            let kx = mesh_coord(l, i);
            let mut acc = [0.0; N];
            for j in 0..l {
                let ky = mesh_coord(l, j);
                for m in 0..l {
                    let values = f(&[kx, ky, mesh_coord(l, m)]);
                    for (a, v) in acc.iter_mut().zip(values) {
                        *a += v;
                    }
                }
            }
            acc
        })
        .collect();

    let count = (l * l * l) as f64;
    let mut total = [0.0; N];
    for plane in planes {
        for (t, v) in total.iter_mut().zip(plane) {
            *t += v;
        }
    }
    total.map(|t| t / count)
}
