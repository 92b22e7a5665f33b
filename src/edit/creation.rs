//=======================================================================//
// IMPORTS
//
//=======================================================================//

use glam::Vec3;

use crate::{
    object_class::ClassHandles,
    world::context::{CreationEntity, EditContext}
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Swaps the creation slot's tagged entity for a new one. When the outgoing or
/// incoming value is an object, its class handle is released or acquired as part of the swap, so the
/// creation slot never holds an object with a stale or missing handle. Never coalesces: a new
/// creation entity is a fresh authoring session, not a continuation of the old one.
#[must_use]
#[derive(Debug)]
pub struct CreationEntitySet
{
    new: CreationEntity,
    old: CreationEntity
}

impl CreationEntitySet
{
    #[inline]
    pub fn new(new: CreationEntity) -> Self { Self { new, old: CreationEntity::None } }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        let old = std::mem::replace(&mut ctx.creation, self.new.clone());

        if let CreationEntity::Object(object) = &old
        {
            classes.free(object.class_handle);
        }

        if let CreationEntity::Object(object) = &mut ctx.creation
        {
            object.class_handle = classes.acquire(&object.class_name);
        }

        self.old = old;
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        let current = std::mem::replace(&mut ctx.creation, self.old.clone());

        if let CreationEntity::Object(object) = &current
        {
            classes.free(object.class_handle);
        }

        if let CreationEntity::Object(object) = &mut ctx.creation
        {
            object.class_handle = classes.acquire(&object.class_name);
        }
    }

    /// Never coalesces: a new creation entity starts a fresh authoring session.
    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self)
    {
        unreachable!("CreationEntitySet never reports coalescable")
    }
}

//=======================================================================//

/// Sets a scalar field of the creation entity. Coalescable by
/// field identity, matching [`crate::edit::field::SetField`]'s scheme but targeting `ctx.creation`
/// instead of a stored entity.
#[must_use]
#[derive(Debug)]
pub struct CreationValue<F>
{
    field: fn(&mut CreationEntity) -> &mut F,
    new:   F,
    old:   F
}

impl<F: Clone> CreationValue<F>
{
    #[inline]
    pub fn new(ctx: &mut EditContext, field: fn(&mut CreationEntity) -> &mut F, new: F) -> Self
    {
        let old = (field)(&mut ctx.creation).clone();
        Self { field, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext) { *(self.field)(&mut ctx.creation) = self.new.clone(); }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext) { *(self.field)(&mut ctx.creation) = self.old.clone(); }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool { self.field == other.field }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//

/// A [`CreationValue`] whose target is the creation object's rotation, additionally keeping
/// `ctx.euler_rotation` in sync: the canonical storage is the
/// quaternion on the object, but the rotation widget edits Euler degrees, so the edit carries both
/// representations and writes them together on apply/revert.
#[must_use]
#[derive(Debug)]
pub struct CreationValueWithMeta
{
    new_rotation: glam::Quat,
    old_rotation: glam::Quat,
    new_euler:    Vec3,
    old_euler:    Vec3
}

impl CreationValueWithMeta
{
    #[inline]
    pub fn new(ctx: &EditContext, new_rotation: glam::Quat, new_euler: Vec3) -> Self
    {
        let old_rotation = ctx.creation.as_object().map_or(glam::Quat::IDENTITY, |o| o.rotation);

        Self {
            new_rotation,
            old_rotation,
            new_euler,
            old_euler: ctx.euler_rotation
        }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        if let Some(object) = ctx.creation.as_object_mut()
        {
            object.rotation = self.new_rotation;
        }

        ctx.euler_rotation = self.new_euler;
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        if let Some(object) = ctx.creation.as_object_mut()
        {
            object.rotation = self.old_rotation;
        }

        ctx.euler_rotation = self.old_euler;
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { true }

    #[inline]
    pub fn coalesce(&mut self, other: Self)
    {
        self.old_rotation = other.old_rotation;
        self.old_euler = other.old_euler;
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::world::entities::Object;

    fn object() -> Object
    {
        Object {
            name: String::new(),
            layer: None,
            position: Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: Vec3::ONE,
            class_name: String::new(),
            class_handle: Default::default(),
            properties: Default::default()
        }
    }

    #[test]
    fn creation_value_apply_then_revert_round_trips()
    {
        let mut ctx = EditContext::new();
        ctx.creation = CreationEntity::Object(object());

        let mut edit = CreationValue::new(
            &mut ctx,
            |c: &mut CreationEntity| &mut c.as_object_mut().unwrap().position,
            Vec3::X
        );
        edit.apply(&mut ctx);
        assert_eq!(ctx.creation.as_object().unwrap().position, Vec3::X);

        edit.revert(&mut ctx);
        assert_eq!(ctx.creation.as_object().unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn with_meta_syncs_euler_and_quaternion_together()
    {
        let mut ctx = EditContext::new();
        ctx.creation = CreationEntity::Object(object());

        let mut edit = CreationValueWithMeta::new(
            &ctx,
            glam::Quat::from_rotation_y(1.0),
            Vec3::new(0.0, 57.3, 0.0)
        );
        edit.apply(&mut ctx);

        assert_eq!(ctx.euler_rotation.y, 57.3);
        assert_eq!(ctx.creation.as_object().unwrap().rotation, glam::Quat::from_rotation_y(1.0));

        edit.revert(&mut ctx);
        assert_eq!(ctx.euler_rotation, Vec3::ZERO);
    }
}
