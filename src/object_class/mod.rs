//=======================================================================//
// IMPORTS
//
//=======================================================================//

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{
    assets::{
        library::{AssetLibrary, AssetLoadError, AssetLoader, ListenerHandle},
        state::{AssetData, AssetRef}
    },
    world::entities::Object
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// A parsed object definition file. Only the fields an editor core needs are kept; mesh/texture
/// munging and the full ODF grammar are out of scope.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct OdfDefinition
{
    pub mesh_name:    String,
    pub display_name: String
}

/// A loaded mesh's bounding geometry, enough for the editor to draw a placeholder and compute
/// picking bounds. Full mesh munging is out of scope.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct MeshModel
{
    pub min: [f32; 3],
    pub max: [f32; 3]
}

//=======================================================================//

/// An opaque index into [`ObjectClassLibrary`]'s slot table. `NULL` names the slot shared
/// by every unresolved or empty class name.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectClassHandle(u32);

impl ObjectClassHandle
{
    pub const NULL: Self = Self(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool { self.0 == Self::NULL.0 }
}

impl Default for ObjectClassHandle
{
    #[inline]
    fn default() -> Self { Self::NULL }
}

//=======================================================================//

/// The resolved composite asset behind an object's `class_name`: the parsed ODF definition plus
/// the referenced mesh, both served from their respective [`AssetLibrary`] instances.
#[must_use]
#[derive(Clone, Default)]
pub struct ObjectClass
{
    pub name:      String,
    odf_ref:       AssetRef<OdfDefinition>,
    odf_data:      Option<AssetData<OdfDefinition>>,
    mesh_ref:      AssetRef<MeshModel>,
    mesh_data:     Option<AssetData<MeshModel>>
}

impl ObjectClass
{
    #[inline]
    #[must_use]
    pub fn definition(&self) -> Option<&OdfDefinition> { self.odf_data.as_deref() }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> Option<&MeshModel> { self.mesh_data.as_deref() }
}

//=======================================================================//

/// Narrow, object-safe view of [`ObjectClassLibrary`] that the edit engine depends on. Keeping this
/// as its own trait lets `crate::edit` take a `&dyn ClassHandles` instead of being generic over the
/// asset loader types `ObjectClassLibrary<OL, ML>` carries, which would otherwise have to infect
/// every edit type that touches an object's class.
pub trait ClassHandles
{
    /// Acquires a handle for `class_name`, as [`ObjectClassLibrary::acquire`].
    fn acquire(&self, class_name: &str) -> ObjectClassHandle;

    /// Releases `handle`, as [`ObjectClassLibrary::free`].
    fn free(&self, handle: ObjectClassHandle);
}

impl<OL, ML> ClassHandles for ObjectClassLibrary<OL, ML>
where
    OL: AssetLoader<OdfDefinition>,
    ML: AssetLoader<MeshModel>
{
    #[inline]
    fn acquire(&self, class_name: &str) -> ObjectClassHandle { Self::acquire(self, class_name) }

    #[inline]
    fn free(&self, handle: ObjectClassHandle) { Self::free(self, handle); }
}

//=======================================================================//

struct Slot
{
    name:       String,
    ref_count:  u32,
    class:      ObjectClass
}

//=======================================================================//

/// Manages the composite asset behind every distinct `class_name` referenced by live objects,
/// grounded on the original's `object_class_library` but restructured around an explicit slot table
/// plus handle, favoring id-plus-lookup over name re-resolution on every access.
pub struct ObjectClassLibrary<OL, ML>
where
    OL: AssetLoader<OdfDefinition>,
    ML: AssetLoader<MeshModel>
{
    odfs:    AssetLibrary<OdfDefinition, OL>,
    meshes:  AssetLibrary<MeshModel, ML>,
    slots:   RwLock<Vec<Option<Slot>>>,
    by_name: RwLock<HashMap<String, u32>>,
    free:    RwLock<Vec<u32>>,
    _odf_listener:  ListenerHandle<OdfDefinition>,
    _mesh_listener: ListenerHandle<MeshModel>
}

impl<OL, ML> ObjectClassLibrary<OL, ML>
where
    OL: AssetLoader<OdfDefinition>,
    ML: AssetLoader<MeshModel>
{
    #[inline]
    pub fn new(odfs: AssetLibrary<OdfDefinition, OL>, meshes: AssetLibrary<MeshModel, ML>) -> Self
    {
        let odf_listener = odfs.listen_for_loads(|_| {});
        let mesh_listener = meshes.listen_for_loads(|_| {});

        let library = Self {
            odfs,
            meshes,
            slots: RwLock::new(Vec::new()),
            by_name: RwLock::new(HashMap::new()),
            free: RwLock::new(Vec::new()),
            _odf_listener: odf_listener,
            _mesh_listener: mesh_listener
        };

        // Slot 0 is the permanent default class shared by empty and unresolved names.
        library.acquire("");
        library
    }

    /// Acquires a handle for `class_name`, allocating a slot and starting the underlying asset
    /// loads on first acquisition. A slot whose reference count has saturated returns
    /// [`ObjectClassHandle::NULL`] instead of incrementing further.
    #[inline]
    pub fn acquire(&self, class_name: &str) -> ObjectClassHandle
    {
        let name = class_name.to_lowercase();

        {
            let by_name = self.by_name.read();
            if let Some(&index) = by_name.get(&name)
            {
                drop(by_name);
                let mut slots = self.slots.write();
                let slot = slots[index as usize].as_mut().expect("indexed slot must be live");

                return match slot.ref_count.checked_add(1)
                {
                    Some(next) =>
                    {
                        slot.ref_count = next;
                        ObjectClassHandle(index)
                    },
                    None => ObjectClassHandle::NULL
                };
            }
        }

        let odf_ref = self.odfs.acquire(&name);
        let mesh_ref = self.meshes.acquire(&name);

        let slot = Slot {
            name: name.clone(),
            ref_count: 1,
            class: ObjectClass {
                name: name.clone(),
                odf_ref,
                odf_data: None,
                mesh_ref,
                mesh_data: None
            }
        };

        let mut slots = self.slots.write();
        let mut free = self.free.write();

        let index = if let Some(index) = free.pop()
        {
            slots[index as usize] = Some(slot);
            index
        }
        else
        {
            slots.push(Some(slot));
            (slots.len() - 1) as u32
        };

        self.by_name.write().insert(name, index);
        ObjectClassHandle(index)
    }

    /// Releases one reference to `handle`. When the count reaches zero, the slot is reclaimed and
    /// its underlying asset refs are dropped. `NULL` is a no-op.
    #[inline]
    pub fn free(&self, handle: ObjectClassHandle)
    {
        if handle.is_null()
        {
            return;
        }

        let mut slots = self.slots.write();
        let Some(slot) = slots[handle.0 as usize].as_mut()
        else
        {
            return;
        };

        slot.ref_count -= 1;

        if slot.ref_count == 0
        {
            let name = slot.name.clone();
            slots[handle.0 as usize] = None;
            self.by_name.write().remove(&name);
            self.free.write().push(handle.0);
        }
    }

    /// Returns the resolved class for `handle`, falling back to the fixed default (the empty-name
    /// slot) when `handle` is null or stale.
    #[inline]
    #[must_use]
    pub fn resolve<R>(&self, handle: ObjectClassHandle, f: impl FnOnce(&ObjectClass) -> R) -> R
    {
        let slots = self.slots.read();

        let class = if handle.is_null()
        {
            None
        }
        else
        {
            slots.get(handle.0 as usize).and_then(Option::as_ref)
        }
        .map(|slot| &slot.class)
        .or_else(|| slots[0].as_ref().map(|slot| &slot.class))
        .expect("slot 0 is the permanent default class and is never freed");

        f(class)
    }

    /// Drains pending load events from the ODF and mesh libraries and patches the affected
    /// [`ObjectClass`] records in place. Called once per tick; never mutates `class_handle` values
    /// stored on live [`Object`]s.
    #[inline]
    pub fn update(&self, _objects: &[Object])
    {
        self.odfs.tick();
        self.meshes.tick();

        let mut slots = self.slots.write();

        for slot in slots.iter_mut().flatten()
        {
            if slot.class.odf_data.is_none()
            {
                slot.class.odf_data = self.odfs.get_if(&slot.class.odf_ref);
            }

            if slot.class.mesh_data.is_none()
            {
                slot.class.mesh_data = self.meshes.get_if(&slot.class.mesh_ref);
            }
        }
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use std::path::{Path, PathBuf};

    use threadpool::ThreadPool;

    use super::*;

    struct OdfLoader;

    impl AssetLoader<OdfDefinition> for OdfLoader
    {
        fn load(&self, _path: &Path) -> Result<OdfDefinition, AssetLoadError>
        {
            Ok(OdfDefinition::default())
        }
    }

    struct MeshLoader;

    impl AssetLoader<MeshModel> for MeshLoader
    {
        fn load(&self, _path: &Path) -> Result<MeshModel, AssetLoadError>
        {
            Ok(MeshModel::default())
        }
    }

    fn library() -> ObjectClassLibrary<OdfLoader, MeshLoader>
    {
        let odfs = AssetLibrary::new(OdfLoader, ThreadPool::new(1));
        let meshes = AssetLibrary::new(MeshLoader, ThreadPool::new(1));
        odfs.add(PathBuf::from("assets/odf/soldier.odf"));
        meshes.add(PathBuf::from("assets/msh/soldier.msh"));
        ObjectClassLibrary::new(odfs, meshes)
    }

    #[test]
    fn acquiring_twice_reuses_the_slot()
    {
        let lib = library();
        let a = lib.acquire("soldier");
        let b = lib.acquire("soldier");
        assert_eq!(a, b);
    }

    #[test]
    fn freeing_to_zero_reclaims_the_slot()
    {
        let lib = library();
        let handle = lib.acquire("soldier");
        lib.free(handle);

        let reacquired = lib.acquire("soldier");
        assert_eq!(handle, reacquired);
    }

    #[test]
    fn unresolved_handle_falls_back_to_default()
    {
        let lib = library();
        lib.resolve(ObjectClassHandle::NULL, |class| assert_eq!(class.name, ""));
    }
}
