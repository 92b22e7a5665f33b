//=======================================================================//
// IMPORTS
//
//=======================================================================//

use crate::{
    identifiers::EntityId,
    world::{
        context::EditContext,
        entities::ObjectKind,
        properties::{ToValue, Value}
    }
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Sets one entry of an object's type-erased property map, converting the concrete value through
/// [`ToValue`]. Reverting restores the previous value, or removes the key entirely if it wasn't
/// present before. Coalescable by entity and key, matching [`crate::edit::field::SetField`]'s scheme.
#[must_use]
#[derive(Debug, Clone)]
pub struct SetObjectProperty
{
    entity_id: EntityId<ObjectKind>,
    key:       String,
    new:       Value,
    old:       Option<Value>
}

impl SetObjectProperty
{
    #[inline]
    pub fn new(ctx: &EditContext, entity_id: EntityId<ObjectKind>, key: String, value: &impl ToValue) -> Self
    {
        let old = ctx.world.objects[&entity_id].properties.get(&key).cloned();
        Self { entity_id, key, new: value.to_value(), old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        ctx.world
            .objects
            .get_mut(&self.entity_id)
            .expect("SetObjectProperty target missing")
            .properties
            .insert(self.key.clone(), self.new.clone());
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let object = ctx
            .world
            .objects
            .get_mut(&self.entity_id)
            .expect("SetObjectProperty target missing");

        match &self.old
        {
            Some(value) =>
            {
                object.properties.insert(self.key.clone(), value.clone());
            },
            None =>
            {
                object.properties.remove(&self.key);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool
    {
        self.entity_id == other.entity_id && self.key == other.key
    }

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
    use super::*;
    use crate::world::entities::Object;

    fn object() -> Object
    {
        Object {
            name: "soldier".to_owned(),
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
    fn apply_then_revert_restores_an_absent_key()
    {
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut edit = SetObjectProperty::new(&ctx, id, "health".to_owned(), &42u8);
        edit.apply(&mut ctx);
        assert!(matches!(ctx.world.objects[&id].properties["health"], Value::U8(42)));

        edit.revert(&mut ctx);
        assert!(!ctx.world.objects[&id].properties.contains_key("health"));
    }

    #[test]
    fn apply_then_revert_restores_a_prior_value()
    {
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        let mut obj = object();
        obj.properties.insert("health".to_owned(), Value::U8(10));
        ctx.world.objects.insert(id, obj);

        let mut edit = SetObjectProperty::new(&ctx, id, "health".to_owned(), &42u8);
        edit.apply(&mut ctx);
        assert!(matches!(ctx.world.objects[&id].properties["health"], Value::U8(42)));

        edit.revert(&mut ctx);
        assert!(matches!(ctx.world.objects[&id].properties["health"], Value::U8(10)));
    }
}
