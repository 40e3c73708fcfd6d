//! Which files to skip when others are missing or invalid
use crate::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

lazy_static::lazy_static! {
    static ref GTFS_DEPENDENCIES: DependencyTree =
        DependencyTree::from_json(include_str!("../resources/file_dependencies.json"))
            .expect("the embedded file dependency description is valid JSON");
}

/// A tree of file names. The children of a file are the files whose validity depends on it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DependencyTree(BTreeMap<String, DependencyTree>);

impl DependencyTree {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::NamedFileIO {
            file_name: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    /// The dependencies between the files of a GTFS feed
    pub fn gtfs() -> &'static DependencyTree {
        &GTFS_DEPENDENCIES
    }

    pub fn dependents(&self) -> &BTreeMap<String, DependencyTree> {
        &self.0
    }

    fn collect_descendants(&self, closure: &mut BTreeSet<String>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            for (name, child) in &node.0 {
                closure.insert(name.clone());
                stack.push(child);
            }
        }
    }

    /// The seeds and every file depending on one of them, directly or not.
    ///
    /// A file can appear at several places of the tree: the descendants of all of them are taken.
    pub fn exclusion_closure<I, S>(&self, seeds: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeds: BTreeSet<String> = seeds.into_iter().map(|s| s.as_ref().to_owned()).collect();
        let mut closure = seeds.clone();
        if seeds.is_empty() {
            return closure;
        }
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            for (name, child) in &node.0 {
                if seeds.contains(name) {
                    child.collect_descendants(&mut closure);
                }
                stack.push(child);
            }
        }
        closure
    }
}
