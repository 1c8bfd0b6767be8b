//! Typed accessors for solvable model fields.
//!
//! Each model has a closed enum of identifiers with compile-time get/set
//! pairs. A [`Binding`] maps an ordered list of identifiers onto the
//! positions of a solver vector.

use nalgebra::DVector;
use std::fmt::Debug;

/// What a variable means to the solver driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRole {
    /// `<S>` or `<S^2>` of an ionic site; may be pinned to zero.
    OrderParameter,
    /// Electronic chemical potential; fixed by the filling equation.
    ChemicalPotential,
}

pub trait Variable<S>: Copy + Eq + Debug + 'static {
    fn get(&self, state: &S) -> f64;
    fn set(&self, state: &mut S, value: f64);
    fn name(&self) -> &'static str;
    fn role(&self) -> VarRole;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<V> {
    vars: Vec<V>,
}

impl<V: Copy> Binding<V> {
    pub fn new(vars: Vec<V>) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &[V] {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Gather the bound fields into a vector in binding order.
    pub fn read<S>(&self, state: &S) -> DVector<f64>
    where
        V: Variable<S>,
    {
        DVector::from_iterator(self.vars.len(), self.vars.iter().map(|v| v.get(state)))
    }

    /// Write `x[i]` into the field bound at position `i`.
    pub fn write<S>(&self, state: &mut S, x: &DVector<f64>)
    where
        V: Variable<S>,
    {
        debug_assert_eq!(x.len(), self.vars.len());
        for (v, &value) in self.vars.iter().zip(x.iter()) {
            v.set(state, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cubic::{CubicEnv, CubicVar};

    #[test]
    fn binding_reads_and_writes_in_order() {
        let mut env = CubicEnv::default();
        let binding = Binding::new(vec![CubicVar::Mu, CubicVar::M]);
        binding.write(&mut env, &DVector::from_vec(vec![0.25, 0.75]));
        assert_eq!(env.mu, 0.25);
        assert_eq!(env.m, 0.75);
        let x = binding.read(&env);
        assert_eq!(x.as_slice(), &[0.25, 0.75]);
    }
}
