//! Hermitian eigendecomposition of 4x4 Bloch Hamiltonians.

use mft_model::HMatrix;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Eigenvalues and eigenvectors (columns of `vectors`).
#[derive(Debug, Clone)]
pub struct Eigensystem {
    pub energies: [f64; 4],
    pub vectors: HMatrix,
}

pub trait HermitianEigensolver: Sync {
    fn eigensystem(&self, h: &HMatrix) -> Eigensystem;

    fn eigenvalues(&self, h: &HMatrix) -> [f64; 4] {
        self.eigensystem(h).energies
    }
}

/// Dense solver backed by nalgebra's `SymmetricEigen`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraEigensolver;

impl HermitianEigensolver for NalgebraEigensolver {
    fn eigensystem(&self, h: &HMatrix) -> Eigensystem {
        let eig = h.symmetric_eigen();
        let mut energies = [0.0; 4];
        energies.copy_from_slice(eig.eigenvalues.as_slice());
        Eigensystem {
            energies,
            vectors: eig.eigenvectors,
        }
    }

    fn eigenvalues(&self, h: &HMatrix) -> [f64; 4] {
        let values = h.symmetric_eigenvalues();
        let mut energies = [0.0; 4];
        energies.copy_from_slice(values.as_slice());
        energies
    }
}

/// Wraps a solver and counts diagonalizations.
#[derive(Debug, Default)]
pub struct CountingEigensolver<E = NalgebraEigensolver> {
    inner: E,
    calls: AtomicUsize,
}

impl<E: HermitianEigensolver> CountingEigensolver<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<E: HermitianEigensolver> HermitianEigensolver for CountingEigensolver<E> {
    fn eigensystem(&self, h: &HMatrix) -> Eigensystem {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.eigensystem(h)
    }

    fn eigenvalues(&self, h: &HMatrix) -> [f64; 4] {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.eigenvalues(h)
    }
}
