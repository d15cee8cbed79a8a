//! The static archive catalog: filename to expected MD5 digest.
//!
//! Catalog order is processing order. The built-in set covers the
//! nuScenes v1.0 trainval release (metadata plus ten blob archives).

use indexmap::IndexMap;

/// nuScenes v1.0 trainval archives and their published MD5 digests.
const TRAINVAL: &[(&str, &str)] = &[
    ("v1.0-trainval_meta.tgz", "537d3954ec34e5bcb89a35d4f6fb0d4a"),
    ("v1.0-trainval01_blobs.tgz", "cbf32d2ea6996fc599b32f724e7ce8f2"),
    ("v1.0-trainval02_blobs.tgz", "aeecea4878ec3831d316b382bb2f72da"),
    ("v1.0-trainval03_blobs.tgz", "595c29528351060f94c935e3aaf7b995"),
    ("v1.0-trainval04_blobs.tgz", "b55eae9b4aa786b478858a3fc92fb72d"),
    ("v1.0-trainval05_blobs.tgz", "1c815ed607a11be7446dcd4ba0e71ed0"),
    ("v1.0-trainval06_blobs.tgz", "7273eeea36e712be290472859063a678"),
    ("v1.0-trainval07_blobs.tgz", "46674d2b2b852b7a857d2c9a87fc755f"),
    ("v1.0-trainval08_blobs.tgz", "37524bd4edee2ab99678909334313adf"),
    ("v1.0-trainval09_blobs.tgz", "a7fcd6d9c0934e4052005aa0b84615c0"),
    ("v1.0-trainval10_blobs.tgz", "31e795f2c13f62533c727119b822d739"),
];

/// Ordered mapping of archive filename to expected MD5 hex digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveCatalog {
    entries: IndexMap<String, String>,
}

impl ArchiveCatalog {
    /// The built-in nuScenes v1.0 trainval catalog.
    pub fn trainval() -> Self {
        let entries = TRAINVAL
            .iter()
            .map(|(name, md5)| (name.to_string(), md5.to_string()))
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit (filename, digest) pairs, preserving order.
    pub fn from_entries<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, digest)| (name.into(), digest.into()))
            .collect();
        Self { entries }
    }

    /// Expected digest for a filename, if the catalog knows it.
    pub fn expected_digest(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Narrow the catalog to the named subset, keeping catalog order.
    ///
    /// Returns the names that were not found in the catalog.
    pub fn retain(&mut self, names: &[String]) -> Vec<String> {
        let unknown: Vec<String> = names
            .iter()
            .filter(|n| !self.entries.contains_key(n.as_str()))
            .cloned()
            .collect();
        self.entries.retain(|k, _| names.iter().any(|n| n == k));
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trainval_catalog_is_complete_and_ordered() {
        let catalog = ArchiveCatalog::trainval();
        assert_eq!(catalog.len(), 11);

        let first = catalog.iter().next().unwrap();
        assert_eq!(first.0, "v1.0-trainval_meta.tgz");
        assert_eq!(first.1, "537d3954ec34e5bcb89a35d4f6fb0d4a");

        let last = catalog.iter().last().unwrap();
        assert_eq!(last.0, "v1.0-trainval10_blobs.tgz");
    }

    #[test]
    fn digests_are_md5_length() {
        for (_, digest) in ArchiveCatalog::trainval().iter() {
            assert_eq!(digest.len(), 32);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn retain_keeps_order_and_reports_unknown() {
        let mut catalog = ArchiveCatalog::trainval();
        let unknown = catalog.retain(&[
            "v1.0-trainval02_blobs.tgz".to_string(),
            "v1.0-trainval_meta.tgz".to_string(),
            "nope.tgz".to_string(),
        ]);

        assert_eq!(unknown, vec!["nope.tgz".to_string()]);
        let names: Vec<&str> = catalog.iter().map(|(n, _)| n).collect();
        // Catalog order wins over the order names were requested in.
        assert_eq!(names, vec!["v1.0-trainval_meta.tgz", "v1.0-trainval02_blobs.tgz"]);
    }

    #[test]
    fn expected_digest_lookup() {
        let catalog = ArchiveCatalog::trainval();
        assert_eq!(
            catalog.expected_digest("v1.0-trainval05_blobs.tgz"),
            Some("1c815ed607a11be7446dcd4ba0e71ed0")
        );
        assert_eq!(catalog.expected_digest("missing.tgz"), None);
    }
}
