//! Enumeration of spin configurations.

/// Spin values a single site can take.
pub const SPINS: [f64; 3] = [-1.0, 0.0, 1.0];

/// All `3^N` configurations of `N` site types.
///
/// The first site varies slowest: for `N = 2` the order is
/// `(-1,-1), (-1,0), (-1,1), (0,-1), ...`.
#[derive(Debug, Clone)]
pub struct ConfigurationSet<const N: usize> {
    configs: Vec<[f64; N]>,
}

impl<const N: usize> Default for ConfigurationSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ConfigurationSet<N> {
    pub fn new() -> Self {
        let count = 3usize.pow(N as u32);
        let configs = (0..count)
            .map(|c| {
                let mut spins = [0.0; N];
                let mut rest = c;
                for slot in spins.iter_mut().rev() {
                    *slot = SPINS[rest % 3];
                    rest /= 3;
                }
                spins
            })
            .collect();
        Self { configs }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn as_slice(&self) -> &[[f64; N]] {
        &self.configs
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64; N]> {
        self.configs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_site_type() {
        let set = ConfigurationSet::<1>::new();
        assert_eq!(set.as_slice(), &[[-1.0], [0.0], [1.0]]);
    }

    #[test]
    fn four_site_types_first_varies_slowest() {
        let set = ConfigurationSet::<4>::new();
        assert_eq!(set.len(), 81);
        assert_eq!(set.as_slice()[0], [-1.0, -1.0, -1.0, -1.0]);
        assert_eq!(set.as_slice()[1], [-1.0, -1.0, -1.0, 0.0]);
        assert_eq!(set.as_slice()[27], [0.0, -1.0, -1.0, -1.0]);
        assert_eq!(set.as_slice()[80], [1.0, 1.0, 1.0, 1.0]);
    }

    mod proptests {
        use super::super::*;
        use proptest::prelude::*;

        fn distinct<const N: usize>() -> bool {
            let set = ConfigurationSet::<N>::new();
            let mut keys: Vec<Vec<i8>> = set
                .iter()
                .map(|c| c.iter().map(|&s| s as i8).collect())
                .collect();
            keys.sort();
            keys.dedup();
            keys.len() == 3usize.pow(N as u32)
        }

        proptest! {
            #[test]
            fn every_spin_value_appears_equally(site in 0usize..4) {
                let set = ConfigurationSet::<4>::new();
                for value in SPINS {
                    let count = set.iter().filter(|c| c[site] == value).count();
                    prop_assert_eq!(count, 27);
                }
            }
        }

        #[test]
        fn configurations_are_distinct() {
            assert!(distinct::<1>());
            assert!(distinct::<2>());
            assert!(distinct::<4>());
        }
    }
}
