//! Dependency resolution over the registry graph
//!
//! Produces the install order for a request: every item appears once, and
//! every item's registry dependencies appear strictly before it.

use std::collections::HashSet;
use tracing::{debug, trace};

use crate::error::{RegistryError, Result};
use crate::registry::{RegistryItem, RegistryStore};

/// Resolve requested names into a dependency-closed, ordered item list
///
/// Requested names are processed in order; each item's dependencies are
/// resolved in declared order before the item itself is appended. Fails with
/// `UnknownItem` for any absent name and `CyclicDependency` when a name is
/// reached again while its own subtree is still being expanded.
pub fn resolve<'a, S: AsRef<str>>(
    store: &'a RegistryStore,
    requested: &[S],
) -> Result<Vec<&'a RegistryItem>> {
    let mut walk = Walk {
        store,
        resolved: Vec::new(),
        done: HashSet::new(),
        stack: Vec::new(),
    };

    for name in requested {
        walk.visit(name.as_ref())?;
    }

    debug!(
        "Resolved {} requested item(s) into {} item(s)",
        requested.len(),
        walk.resolved.len()
    );
    Ok(walk.resolved)
}

/// Deduplicated external dependencies of `items`, first-seen order
pub fn collect_dependencies(items: &[&RegistryItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .flat_map(|item| item.dependencies.iter())
        .filter(|dep| seen.insert(dep.as_str()))
        .cloned()
        .collect()
}

struct Walk<'a> {
    store: &'a RegistryStore,
    resolved: Vec<&'a RegistryItem>,
    done: HashSet<&'a str>,
    /// Names whose subtree is being expanded, outermost first
    stack: Vec<&'a str>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, name: &str) -> Result<()> {
        if self.done.contains(name) {
            return Ok(());
        }

        if let Some(pos) = self.stack.iter().position(|&n| n == name) {
            let mut cycle: Vec<&str> = self.stack[pos..].to_vec();
            cycle.push(name);
            return Err(RegistryError::CyclicDependency {
                cycle: cycle.join(" -> "),
            });
        }

        let store = self.store;
        let item = store.lookup(name)?;
        trace!("Expanding {} ({} deps)", item.name, item.registry_dependencies.len());

        self.stack.push(item.name.as_str());
        for dep in &item.registry_dependencies {
            self.visit(dep)?;
        }
        self.stack.pop();

        self.done.insert(item.name.as_str());
        self.resolved.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ItemKind, RegistryFile};
    use pretty_assertions::assert_eq;

    fn item(name: &str, deps: &[&str], packages: &[&str]) -> RegistryItem {
        RegistryItem {
            name: name.to_string(),
            kind: ItemKind::UiComponent,
            description: String::new(),
            dependencies: packages.iter().map(|p| p.to_string()).collect(),
            registry_dependencies: deps.iter().map(|d| d.to_string()).collect(),
            files: vec![RegistryFile {
                target: format!("ui/{name}.tsx"),
                content: String::new(),
            }],
        }
    }

    fn names(items: &[&RegistryItem]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_diamond_resolves_shared_dependency_once() {
        let store = RegistryStore::new(vec![
            item("a", &["b", "c"], &[]),
            item("b", &[], &[]),
            item("c", &["b"], &[]),
        ])
        .unwrap();

        let resolved = resolve(&store, &["a"]).unwrap();
        assert_eq!(names(&resolved), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_dependency_before_dependent() {
        let store = RegistryStore::new(vec![
            item("button", &[], &[]),
            item("dialog", &["button"], &[]),
        ])
        .unwrap();

        let resolved = resolve(&store, &["dialog"]).unwrap();
        assert_eq!(names(&resolved), vec!["button", "dialog"]);
    }

    #[test]
    fn test_request_order_and_duplicates() {
        let store = RegistryStore::new(vec![
            item("x", &[], &[]),
            item("y", &[], &[]),
            item("z", &["x"], &[]),
        ])
        .unwrap();

        let resolved = resolve(&store, &["y", "z", "y", "x"]).unwrap();
        assert_eq!(names(&resolved), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_unknown_requested_name() {
        let store = RegistryStore::new(vec![item("a", &[], &[])]).unwrap();
        let err = resolve(&store, &["does-not-exist"]).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownItem(ref n) if n == "does-not-exist"));
    }

    #[test]
    fn test_unknown_transitive_name() {
        let store = RegistryStore::new(vec![item("a", &["ghost"], &[])]).unwrap();
        let err = resolve(&store, &["a"]).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownItem(ref n) if n == "ghost"));
    }

    #[test]
    fn test_cycle_is_reported_with_path() {
        let store = RegistryStore::new(vec![
            item("root", &["a"], &[]),
            item("a", &["b"], &[]),
            item("b", &["c"], &[]),
            item("c", &["a"], &[]),
        ])
        .unwrap();

        match resolve(&store, &["root"]).unwrap_err() {
            RegistryError::CyclicDependency { cycle } => assert_eq!(cycle, "a -> b -> c -> a"),
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_closure_over_builtin_registry() {
        let store = RegistryStore::builtin().unwrap();
        let all = store.all_names();
        let resolved = resolve(&store, &all).unwrap();

        let present: HashSet<&str> = resolved.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(present.len(), resolved.len());
        for (pos, item) in resolved.iter().enumerate() {
            for dep in &item.registry_dependencies {
                let dep_pos = resolved.iter().position(|i| &i.name == dep).unwrap();
                assert!(dep_pos < pos, "{dep} must precede {}", item.name);
            }
        }
    }

    #[test]
    fn test_collect_dependencies_dedupes() {
        let a = item("a", &[], &["clsx", "tailwind-merge"]);
        let b = item("b", &[], &["clsx", "class-variance-authority"]);

        assert_eq!(
            collect_dependencies(&[&a, &b]),
            vec!["clsx", "tailwind-merge", "class-variance-authority"]
        );
    }
}
