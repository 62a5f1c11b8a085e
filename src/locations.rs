//! Location hierarchy.
//!
//! Builds a rooted tree from the flat location list and answers the
//! queries the summary engine needs: concrete locations under a branch,
//! nodes matching a predicate and the top-level regions of a location.

use crate::models::Location;
use std::collections::HashMap;
use tracing::debug;

/// Path carried by top-level regions (direct children of the global root).
pub const TOP_REGION_PATH: &str = "/";

/// Rooted location tree over a borrowed location list.
#[derive(Debug)]
pub struct LocationTree<'a> {
    locations: &'a [Location],
    by_id: HashMap<u64, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    top_region_path: String,
}

impl<'a> LocationTree<'a> {
    /// Build the tree from a flat location list.
    pub fn build(locations: &'a [Location]) -> Self {
        Self::build_with_top_path(locations, TOP_REGION_PATH)
    }

    /// Build the tree with a custom path marking top-level regions.
    pub fn build_with_top_path(locations: &'a [Location], top_region_path: &str) -> Self {
        let by_id: HashMap<u64, usize> = locations
            .iter()
            .enumerate()
            .map(|(idx, loc)| (loc.id, idx))
            .collect();

        let global_roots: Vec<usize> = locations
            .iter()
            .enumerate()
            .filter(|(_, loc)| loc.is_root())
            .map(|(idx, _)| idx)
            .collect();
        let global_root = match global_roots.as_slice() {
            [single] => Some(*single),
            _ => None,
        };

        let mut children = vec![Vec::new(); locations.len()];
        let mut roots = Vec::new();

        for (idx, loc) in locations.iter().enumerate() {
            let parent = if loc.is_root() {
                None
            } else {
                match parent_id(loc.path.as_deref().unwrap_or_default()) {
                    Some(id) => by_id.get(&id).copied().filter(|p| *p != idx),
                    None => global_root.filter(|p| *p != idx),
                }
            };

            match parent {
                Some(p) => children[p].push(idx),
                None => roots.push(idx),
            }
        }

        debug!(
            "Built location tree: {} locations, {} roots",
            locations.len(),
            roots.len()
        );

        Self {
            locations,
            by_id,
            children,
            roots,
            top_region_path: top_region_path.to_string(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&'a Location> {
        self.by_id.get(&id).map(|idx| &self.locations[*idx])
    }

    pub fn roots(&self) -> impl Iterator<Item = &'a Location> + '_ {
        self.roots.iter().map(|idx| &self.locations[*idx])
    }

    /// All concrete (non-region) locations in the branch rooted at `id`,
    /// including the node itself.
    pub fn leaf_locations_under(&self, id: u64) -> Vec<&'a Location> {
        let Some(&start) = self.by_id.get(&id) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut visited = vec![false; self.locations.len()];
        let mut stack = vec![start];

        while let Some(idx) = stack.pop() {
            if std::mem::replace(&mut visited[idx], true) {
                continue;
            }
            let loc = &self.locations[idx];
            if !loc.is_region {
                found.push(loc);
            }
            stack.extend(self.children[idx].iter().rev());
        }

        found
    }

    /// All locations in the tree satisfying `pred`, in input order.
    pub fn matching_nodes<F>(&self, pred: F) -> Vec<&'a Location>
    where
        F: Fn(&Location) -> bool,
    {
        self.locations.iter().filter(|loc| pred(loc)).collect()
    }

    /// Whether `id` names a known concrete location.
    pub fn is_implementation_location(&self, id: u64) -> bool {
        self.get(id).map_or(false, |loc| !loc.is_region)
    }

    /// Regions covering an entity anchored at `id`: the location itself,
    /// or every top-level region when it is the global root.
    pub fn top_regions_for(&self, id: u64) -> Vec<&'a Location> {
        match self.get(id) {
            Some(loc) if loc.is_root() => self.matching_nodes(|l| {
                l.path.as_deref() == Some(self.top_region_path.as_str())
            }),
            Some(loc) => vec![loc],
            None => Vec::new(),
        }
    }
}

/// Last numeric segment of a materialized path.
fn parent_id(path: &str) -> Option<u64> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .last()
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: u64, name: &str, path: Option<&str>, is_region: bool) -> Location {
        Location {
            id,
            name: name.to_string(),
            path: path.map(String::from),
            is_region,
        }
    }

    fn sample() -> Vec<Location> {
        vec![
            loc(1, "World", None, true),
            loc(2, "Europe", Some("/"), true),
            loc(3, "Americas", Some("/"), true),
            loc(4, "Madrid", Some("/2/"), false),
            loc(5, "Lisbon", Some("/2/"), false),
            loc(6, "Iberia", Some("/2/"), true),
            loc(7, "Porto", Some("/2/6/"), false),
            loc(8, "Boston", Some("/3/"), false),
        ]
    }

    #[test]
    fn test_leaf_locations_under_region() {
        let locations = sample();
        let tree = LocationTree::build(&locations);

        let mut ids: Vec<u64> = tree.leaf_locations_under(2).iter().map(|l| l.id).collect();
        ids.sort();
        assert_eq!(ids, vec![4, 5, 7]);

        assert_eq!(tree.leaf_locations_under(1).len(), 4);
    }

    #[test]
    fn test_leaf_locations_under_concrete_location() {
        let locations = sample();
        let tree = LocationTree::build(&locations);
        let leaves = tree.leaf_locations_under(8);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].name, "Boston");
    }

    #[test]
    fn test_unknown_location() {
        let locations = sample();
        let tree = LocationTree::build(&locations);
        assert!(tree.leaf_locations_under(99).is_empty());
        assert!(!tree.is_implementation_location(99));
        assert!(tree.top_regions_for(99).is_empty());
    }

    #[test]
    fn test_top_regions() {
        let locations = sample();
        let tree = LocationTree::build(&locations);

        let names: Vec<&str> = tree.top_regions_for(1).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Europe", "Americas"]);

        let names: Vec<&str> = tree.top_regions_for(6).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Iberia"]);
    }

    #[test]
    fn test_is_implementation_location() {
        let locations = sample();
        let tree = LocationTree::build(&locations);
        assert!(tree.is_implementation_location(4));
        assert!(!tree.is_implementation_location(2));
    }

    #[test]
    fn test_roots_without_global_node() {
        let locations = vec![
            loc(2, "Europe", Some("/"), true),
            loc(4, "Madrid", Some("/2/"), false),
        ];
        let tree = LocationTree::build(&locations);
        let roots: Vec<u64> = tree.roots().map(|l| l.id).collect();
        assert_eq!(roots, vec![2]);
        assert_eq!(tree.leaf_locations_under(2).len(), 1);
    }

    #[test]
    fn test_parent_id() {
        assert_eq!(parent_id("/"), None);
        assert_eq!(parent_id("/2/6/"), Some(6));
        assert_eq!(parent_id("/2"), Some(2));
    }
}
