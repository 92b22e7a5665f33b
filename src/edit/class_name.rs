//=======================================================================//
// IMPORTS
//
//=======================================================================//

use crate::{
    identifiers::EntityId,
    object_class::ClassHandles,
    world::{context::EditContext, entities::ObjectKind}
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Changes an object's `class_name`, releasing the class handle it held and acquiring a fresh one
/// for the new name on every apply and every revert. Grounded on
/// `original_source/src/edits/set_class_name.cpp`: the original resolves the new class eagerly at
/// edit-construction time so a bad name surfaces immediately rather than on the next undo/redo pass.
#[must_use]
#[derive(Debug)]
pub struct SetClassName
{
    entity_id: EntityId<ObjectKind>,
    new:       String,
    old:       String
}

impl SetClassName
{
    #[inline]
    pub fn new(ctx: &EditContext, entity_id: EntityId<ObjectKind>, new: String) -> Self
    {
        let old = ctx.world.objects[&entity_id].class_name.clone();
        Self { entity_id, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        let object = ctx.world.objects.get_mut(&self.entity_id).expect("SetClassName target missing");
        classes.free(object.class_handle);
        object.class_handle = classes.acquire(&self.new);
        object.class_name = self.new.clone();
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        let object = ctx.world.objects.get_mut(&self.entity_id).expect("SetClassName target missing");
        classes.free(object.class_handle);
        object.class_handle = classes.acquire(&self.old);
        object.class_name = self.old.clone();
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool { self.entity_id == other.entity_id }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use std::path::{Path as StdPath, PathBuf};

    use threadpool::ThreadPool;

    use super::*;
    use crate::{
        assets::library::{AssetLibrary, AssetLoadError, AssetLoader},
        object_class::{MeshModel, ObjectClassLibrary, OdfDefinition}
    };

    struct NullLoader<T>(std::marker::PhantomData<T>);

    impl<T: Default> AssetLoader<T> for NullLoader<T>
    {
        fn load(&self, _path: &StdPath) -> Result<T, AssetLoadError>
        {
            Ok(T::default())
        }
    }

    fn library() -> ObjectClassLibrary<NullLoader<OdfDefinition>, NullLoader<MeshModel>>
    {
        let odfs = AssetLibrary::new(NullLoader(std::marker::PhantomData), ThreadPool::new(1));
        let meshes = AssetLibrary::new(NullLoader(std::marker::PhantomData), ThreadPool::new(1));
        odfs.add(PathBuf::from("soldier.odf"));
        meshes.add(PathBuf::from("soldier.msh"));
        ObjectClassLibrary::new(odfs, meshes)
    }

    fn object() -> crate::world::entities::Object
    {
        crate::world::entities::Object {
            name: "x".to_owned(),
            layer: None,
            position: Default::default(),
            rotation: glam::Quat::IDENTITY,
            scale: glam::Vec3::ONE,
            class_name: String::new(),
            class_handle: Default::default(),
            properties: Default::default()
        }
    }

    #[test]
    fn apply_then_revert_restores_the_old_class_and_handle()
    {
        let classes = library();
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut edit = SetClassName::new(&ctx, id, "soldier".to_owned());
        edit.apply(&mut ctx, &classes);
        assert_eq!(ctx.world.objects[&id].class_name, "soldier");
        assert!(!ctx.world.objects[&id].class_handle.is_null());

        edit.revert(&mut ctx, &classes);
        assert_eq!(ctx.world.objects[&id].class_name, "");
    }
}
