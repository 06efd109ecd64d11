//! Run-wide key/value store published to the host engine

use super::Configuration;
use rustc_hash::FxHashMap;

/// Scalar parameters the host's flux/source kernels read by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemData {
    values: FxHashMap<String, f64>,
}

impl ProblemData {
    /// Populate the store from a configuration and the grid spacing `dx`
    pub fn from_configuration(config: &Configuration, dx: f64) -> Self {
        let chi = config.nonlinear();
        let derived = config.derived();
        let mut data = Self::default();
        data.insert("dx", dx);
        data.insert("chi2_e", chi.chi2_e);
        data.insert("chi3_e", chi.chi3_e);
        data.insert("chi2_m", chi.chi2_m);
        data.insert("chi3_m", chi.chi3_m);
        data.insert("eo", derived.eo);
        data.insert("mo", derived.mo);
        data.insert("co", derived.co);
        data.insert("zo", derived.zo);
        data
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in key order
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NonlinearParameters, SimulationParameters};

    #[test]
    fn test_problem_data_keys() {
        let params = SimulationParameters {
            nonlinear: NonlinearParameters {
                chi2_e: 0.1,
                chi3_e: 0.2,
                chi2_m: 0.3,
                chi3_m: 0.4,
            },
            ..Default::default()
        };
        let config = Configuration::new(params).unwrap();
        let data = ProblemData::from_configuration(&config, 2.5e-8);

        assert_eq!(data.len(), 9);
        assert_eq!(data.get("dx"), Some(2.5e-8));
        assert_eq!(data.get("chi3_m"), Some(0.4));
        assert_eq!(data.get("zo"), Some(config.derived().zo));
        assert_eq!(data.get("missing"), None);

        let keys: Vec<&str> = data.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], "chi2_e");
        assert_eq!(keys[8], "zo");
    }
}
