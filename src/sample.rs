use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named sample as produced by the upload step. The data series is
/// opaque to this application; it is carried through to submission untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub data: Vec<f64>,
}

impl Sample {
    pub fn new(name: &str, data: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }
}

/// The fixed set of named samples available after an upload. Read-only once
/// constructed; names keep their upload order so selector widgets stay in a
/// stable order no matter how often the pool is re-derived.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    order: Vec<String>,
    samples: HashMap<String, Sample>,
}

impl Catalog {
    /// Sample names are unique within an upload by contract with the
    /// companion service; if that contract is broken, the first occurrence
    /// wins.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut ret = Self::default();
        for sample in samples {
            if ret.samples.contains_key(&sample.name) {
                eprintln!("Duplicate sample name in upload, keeping first: {}", sample.name);
                continue;
            }
            ret.order.push(sample.name.clone());
            ret.samples.insert(sample.name.clone(), sample);
        }
        ret
    }

    /// All sample names in upload order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&Sample> {
        self.samples.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.samples.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Sample {
        Sample::new(name, vec![1.0, 2.0, 3.0])
    }

    #[test]
    fn test_catalog_preserves_upload_order() {
        let catalog = Catalog::from_samples(vec![sample("z"), sample("a"), sample("m")]);
        assert_eq!(catalog.names(), ["z", "a", "m"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_catalog_keeps_first_on_duplicate_name() {
        let catalog = Catalog::from_samples(vec![
            Sample::new("x", vec![1.0]),
            Sample::new("x", vec![9.0]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("x").unwrap().data, vec![1.0]);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::from_samples(vec![sample("a")]);
        assert!(catalog.contains("a"));
        assert!(!catalog.contains("b"));
        assert!(catalog.get("b").is_none());
    }
}
