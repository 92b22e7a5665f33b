//=======================================================================//
// IMPORTS
//
//=======================================================================//

use crate::world::{context::EditContext, entities::Requirement};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Renames a layer and rewrites every `test_<old>`-tagged entry inside the world's and every game
/// mode's requirement-entry lists to `test_<new>`, recording `<old>` in `World::deleted_layers` so a
/// later artifact-cleanup pass can find leftovers filed under it. Grounded on
/// `original_source/tests/src/edits/rename_layer_tests.cpp`: the rename only ever touches tagged
/// entries nested inside `requirements[].entries[]`, never a game mode's own `name`. Coalescable by
/// layer index.
#[must_use]
#[derive(Debug, Clone)]
pub struct RenameLayer
{
    layer_index: usize,
    new:         String,
    old:         String
}

impl RenameLayer
{
    #[inline]
    pub fn new(ctx: &EditContext, layer_index: usize, new: String) -> Self
    {
        let old = ctx.world.layer_descriptions[layer_index].name.clone();
        Self { layer_index, new, old }
    }

    #[inline]
    fn rewrite_entries(requirements: &mut [Requirement], from_tag: &str, to_tag: &str)
    {
        for requirement in requirements
        {
            for entry in &mut requirement.entries
            {
                if entry == from_tag
                {
                    *entry = to_tag.to_owned();
                }
            }
        }
    }

    #[inline]
    fn rewrite(&self, ctx: &mut EditContext, from: &str, to: &str)
    {
        let from_tag = format!("test_{from}");
        let to_tag = format!("test_{to}");

        Self::rewrite_entries(&mut ctx.world.requirements, &from_tag, &to_tag);

        for mode in &mut ctx.world.game_modes
        {
            Self::rewrite_entries(&mut mode.requirements, &from_tag, &to_tag);
        }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        ctx.world.layer_descriptions[self.layer_index].name = self.new.clone();
        self.rewrite(ctx, &self.old.clone(), &self.new.clone());
        ctx.world.deleted_layers.push(self.old.clone());
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        ctx.world.layer_descriptions[self.layer_index].name = self.old.clone();
        self.rewrite(ctx, &self.new.clone(), &self.old.clone());
        ctx.world.deleted_layers.pop();
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool { self.layer_index == other.layer_index }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//

/// Removes a [`Requirement`] by index, stashing it for restoration on revert. Never coalesces.
#[must_use]
#[derive(Debug)]
pub struct DeleteWorldReqList
{
    index:       usize,
    requirement: Option<Requirement>
}

impl DeleteWorldReqList
{
    #[inline]
    pub fn new(index: usize) -> Self { Self { index, requirement: None } }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        self.requirement = Some(ctx.world.requirements.remove(self.index));
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let requirement = self.requirement.take().expect("DeleteWorldReqList reverted without apply");
        ctx.world.requirements.insert(self.index, requirement);
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self)
    {
        unreachable!("DeleteWorldReqList never reports coalescable")
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
    use crate::world::entities::GameMode;

    #[test]
    fn rename_layer_rewrites_tagged_entries_and_records_the_old_name()
    {
        let mut ctx = EditContext::new();
        ctx.world.layer_descriptions.push(crate::world::entities::LayerDescription {
            name:    "common".to_owned(),
            visible: true,
            locked:  false
        });
        ctx.world.requirements.push(Requirement {
            file_type: "world".to_owned(),
            entries:   vec!["test_common".to_owned()]
        });
        ctx.world.game_modes.push(GameMode {
            name:         "conquest".to_owned(),
            layers:       vec![0],
            requirements: vec![Requirement {
                file_type: "world".to_owned(),
                entries:   vec!["test_conquest".to_owned()]
            }]
        });

        let mut edit = RenameLayer::new(&ctx, 0, "design".to_owned());
        edit.apply(&mut ctx);

        assert_eq!(ctx.world.layer_descriptions[0].name, "design");
        assert_eq!(ctx.world.requirements[0].entries[0], "test_design");
        assert_eq!(ctx.world.game_modes[0].name, "conquest");
        assert_eq!(ctx.world.game_modes[0].requirements[0].entries[0], "test_conquest");
        assert_eq!(ctx.world.deleted_layers, vec!["common".to_owned()]);

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.layer_descriptions[0].name, "common");
        assert_eq!(ctx.world.requirements[0].entries[0], "test_common");
        assert!(ctx.world.deleted_layers.is_empty());
    }

    #[test]
    fn rename_layer_rewrites_entries_nested_under_a_game_mode()
    {
        let mut ctx = EditContext::new();
        ctx.world.layer_descriptions.push(crate::world::entities::LayerDescription {
            name:    "conquest".to_owned(),
            visible: true,
            locked:  false
        });
        ctx.world.game_modes.push(GameMode {
            name:         "conquest".to_owned(),
            layers:       vec![0],
            requirements: vec![Requirement {
                file_type: "world".to_owned(),
                entries:   vec!["test_conquest".to_owned()]
            }]
        });

        let mut edit = RenameLayer::new(&ctx, 0, "tdm".to_owned());
        edit.apply(&mut ctx);

        assert_eq!(ctx.world.game_modes[0].requirements[0].entries[0], "test_tdm");
        assert_eq!(ctx.world.game_modes[0].name, "conquest");

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.game_modes[0].requirements[0].entries[0], "test_conquest");
    }

    #[test]
    fn delete_req_then_revert_restores_it_at_the_same_index()
    {
        let mut ctx = EditContext::new();
        ctx.world.requirements.push(Requirement {
            file_type: "world".to_owned(),
            entries:   vec!["needs_dlc".to_owned()]
        });

        let mut edit = DeleteWorldReqList::new(0);
        edit.apply(&mut ctx);
        assert!(ctx.world.requirements.is_empty());

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.requirements[0].entries[0], "needs_dlc");
    }
}
