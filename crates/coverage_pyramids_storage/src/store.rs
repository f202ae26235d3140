use crate::{sync, AnyTileStorage, PyramidError, Resource, Result, SmallKeyBuildHasher};

use coverage_pyramids_core::{IdStr, Identifier};

use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// The registry of named `Resource`s.
///
/// Names are unique ignoring case. Removing a resource only detaches it; its pyramids and tiles are freed once the last
/// handle to it is dropped.
pub struct CoverageStore<S = AnyTileStorage> {
    resources: RwLock<IndexMap<Identifier, Arc<Resource<S>>, SmallKeyBuildHasher>>,
}

impl<S> Default for CoverageStore<S> {
    fn default() -> Self {
        Self {
            resources: RwLock::new(IndexMap::with_hasher(SmallKeyBuildHasher::default())),
        }
    }
}

impl<S> CoverageStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new, empty resource. Fails with `AlreadyExists` if the name is taken.
    pub fn create(&self, name: impl Into<Identifier>) -> Result<Arc<Resource<S>>> {
        let name = name.into();
        let mut resources = sync::write(&self.resources);
        if resources.contains_key(&name) {
            return Err(PyramidError::AlreadyExists(name));
        }

        debug!(resource = %name, "created resource");

        let resource = Arc::new(Resource::new(name.clone()));
        resources.insert(name, Arc::clone(&resource));

        Ok(resource)
    }

    pub fn get(&self, name: impl AsRef<IdStr>) -> Option<Arc<Resource<S>>> {
        sync::read(&self.resources).get(name.as_ref()).cloned()
    }

    pub fn contains(&self, name: impl AsRef<IdStr>) -> bool {
        sync::read(&self.resources).contains_key(name.as_ref())
    }

    /// Resource names, in creation order.
    pub fn names(&self) -> Vec<Identifier> {
        sync::read(&self.resources).keys().cloned().collect()
    }

    /// A snapshot of the resources, in creation order.
    pub fn resources(&self) -> Vec<Arc<Resource<S>>> {
        sync::read(&self.resources).values().cloned().collect()
    }

    /// Detaches the resource. Fails with `ResourceNotFound` if there is none by that name.
    pub fn remove(&self, name: impl AsRef<IdStr>) -> Result<Arc<Resource<S>>> {
        let name = name.as_ref();
        let removed = sync::write(&self.resources).shift_remove(name);

        match removed {
            Some(resource) => {
                debug!(resource = %name, "removed resource");

                Ok(resource)
            }
            None => Err(PyramidError::ResourceNotFound(name.into())),
        }
    }

    pub fn len(&self) -> usize {
        sync::read(&self.resources).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> fmt::Debug for CoverageStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageStore")
            .field("resources", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{ErrorKind, SparseTileGrid};

    use coverage_pyramids_core::Crs;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_are_unique_ignoring_case() {
        let store: CoverageStore = CoverageStore::new();
        store.create("Landsat").unwrap();

        let err = store.create("LANDSAT").unwrap_err();
        assert_eq!(err, PyramidError::AlreadyExists("LANDSAT".into()));
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);

        assert!(store.contains("landsat"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn non_ascii_names_are_unique_ignoring_case() {
        let store: CoverageStore = CoverageStore::new();
        let resource = store.create("Élévation").unwrap();

        assert!(store.contains("ÉLÉVATION"));
        assert!(Arc::ptr_eq(&store.get("élévation").unwrap(), &resource));
        assert!(!store.contains("Elevation"));
        assert_eq!(
            store.create("ÉLÉVATION").unwrap_err(),
            PyramidError::AlreadyExists("ÉLÉVATION".into())
        );

        let owned = String::from("éLÉVATION");
        assert!(store.remove(&owned).is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn names_are_listed_in_creation_order() {
        let store: CoverageStore = CoverageStore::new();
        for name in ["b", "a", "c"].iter() {
            store.create(*name).unwrap();
        }

        let expected: Vec<Identifier> = vec!["b".into(), "a".into(), "c".into()];
        assert_eq!(store.names(), expected);
        assert_eq!(store.resources().len(), 3);
    }

    #[test]
    fn remove_detaches_and_misses_are_not_found() {
        let store: CoverageStore<SparseTileGrid> = CoverageStore::new();
        let resource = store.create("dem").unwrap();
        resource.create_pyramid(Crs::WGS84);

        let removed = store.remove("DEM").unwrap();
        assert!(Arc::ptr_eq(&removed, &resource));
        assert!(store.get("dem").is_none());
        assert!(store.is_empty());

        assert_eq!(
            store.remove("dem").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
