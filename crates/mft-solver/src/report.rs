//! Derived quantities reported after a converged solve.

/// Expectation values and free energy at the final state.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    /// `(channel name, value)` in the model's channel order
    pub expectations: Vec<(&'static str, f64)>,
    pub free_energy: f64,
}

impl FinalReport {
    pub fn expectation(&self, name: &str) -> Option<f64> {
        self.expectations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let report = FinalReport {
            expectations: vec![("Dao", 0.25), ("Dco", -0.5)],
            free_energy: -1.0,
        };
        assert_eq!(report.expectation("Dco"), Some(-0.5));
        assert_eq!(report.expectation("Dbe"), None);
    }
}
