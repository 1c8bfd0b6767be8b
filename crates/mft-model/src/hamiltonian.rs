//! Bloch Hamiltonian representation and the model trait the electronic
//! sector consumes.

use nalgebra::{Complex, Matrix4};

/// Crystal momentum `(kx, ky, kz)`.
pub type KPoint = [f64; 3];

/// 4x4 Hamiltonian in the basis `(k,0), (k+Q,0), (k,1), (k+Q,1)`.
pub type HMatrix = Matrix4<Complex<f64>>;

/// Builds a Hermitian matrix from its diagonal and upper triangle.
///
/// Lower-triangle entries are written as literal conjugates of the
/// upper-triangle entries, so the result is exactly Hermitian.
#[derive(Debug, Clone)]
pub struct HermitianBuilder {
    m: HMatrix,
}

impl Default for HermitianBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HermitianBuilder {
    pub fn new() -> Self {
        Self {
            m: HMatrix::zeros(),
        }
    }

    pub fn diagonal(mut self, i: usize, value: f64) -> Self {
        self.m[(i, i)] = Complex::new(value, 0.0);
        self
    }

    /// Set `H[row][col]` (row < col) and its mirror `H[col][row]`.
    pub fn upper(mut self, row: usize, col: usize, value: Complex<f64>) -> Self {
        debug_assert!(row < col, "upper() takes an upper-triangle index");
        self.m[(row, col)] = value;
        self.m[(col, row)] = value.conj();
        self
    }

    pub fn build(self) -> HMatrix {
        self.m
    }
}

/// Check `H == H^dagger` entry by entry within `tol`.
pub fn is_hermitian(h: &HMatrix, tol: f64) -> bool {
    for i in 0..4 {
        for j in 0..4 {
            if (h[(i, j)] - h[(j, i)].conj()).norm() > tol {
                return false;
            }
        }
    }
    true
}

/// A model whose electronic sector can be averaged over the Brillouin zone.
///
/// `hamiltonian` must be pure: the same state and momentum give the same
/// matrix, and concurrent calls are allowed.
pub trait ElectronicModel: Sync {
    /// Points per dimension of the uniform k mesh.
    fn mesh_size(&self) -> usize;

    fn beta(&self) -> f64;

    fn hamiltonian(&self, k: &KPoint) -> HMatrix;

    /// False when every hopping magnitude is below [`crate::HOPPING_EPS`].
    fn hoppings_finite(&self) -> bool;

    /// Snapshot of the solved variables the Hamiltonian depends on.
    fn dependency_key(&self) -> crate::DependencyKey;
}

/// `exp(i * phase)`
pub(crate) fn phase(theta: f64) -> Complex<f64> {
    Complex::new(theta.cos(), theta.sin())
}
