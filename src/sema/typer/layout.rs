// src/sema/typer/layout.rs
//! C-style sequential struct layout with natural alignment.
//!
//! Each data member is placed at the next offset satisfying its alignment;
//! any gap becomes a synthesized `__pad<N>` member that is a real,
//! addressable local entity with its own offset. The total size is rounded
//! up to the maximum member alignment with one trailing padding member.

use super::{ModuleCx, Typer};
use crate::sema::entity::{EntityId, EntityKind, LocalEntity};
use crate::sema::ice;
use crate::sema::scope::ScopeId;
use crate::sema::type_arena::next_multiple;
use crate::sema::type_defs::TypeDefId;
use crate::frontend::Span;

impl Typer {
    /// Compute offsets for the given data members, record size and max
    /// alignment on the definition, and return the member order with
    /// padding entities spliced in.
    pub(super) fn layout_struct(
        &mut self,
        def: TypeDefId,
        members: Vec<EntityId>,
        scope: ScopeId,
        cx: &mut ModuleCx,
    ) -> Vec<EntityId> {
        let mut ordered = Vec::with_capacity(members.len());
        let mut offset = 0usize;
        let mut max_align = 1usize;
        let mut pad_count = 0usize;

        for member in members {
            let Some(ty) = self.entities.get(member).ty else {
                // Field failed to resolve; already diagnosed
                continue;
            };
            let size = self.types.size_of(ty, &self.defs);
            let align = self.types.align_of(ty, &self.defs).max(1);
            max_align = max_align.max(align);

            let pad = (align - (offset % align)) % align;
            if pad > 0 {
                let entity = self.pad_entity(pad_count, pad, offset, scope, cx);
                ordered.push(entity);
                pad_count += 1;
                offset += pad;
            }

            match &mut self.entities.get_mut(member).kind {
                EntityKind::Local(local) => local.offset = Some(offset),
                kind => ice!("{} entity participated in struct layout", kind.describe()),
            }
            ordered.push(member);
            offset += size;
        }

        if offset % max_align != 0 {
            let pad = next_multiple(offset, max_align) - offset;
            let entity = self.pad_entity(pad_count, pad, offset, scope, cx);
            ordered.push(entity);
            offset += pad;
        }

        let data = self.defs.get_mut(def);
        data.size = offset;
        data.align = max_align;
        ordered
    }

    /// Synthesize one `__pad<N>` member of `size` bytes at `offset`.
    fn pad_entity(
        &mut self,
        index: usize,
        size: usize,
        offset: usize,
        scope: ScopeId,
        cx: &mut ModuleCx,
    ) -> EntityId {
        let name = cx.interner.intern(&format!("__pad{index}"));
        let byte = self.types.primitive(crate::sema::types::PrimitiveKind::U8);
        let ty = self.types.fixed_array(byte, size);
        let local = LocalEntity {
            initialized: true,
            synthetic: true,
            offset: Some(offset),
            ..LocalEntity::plain(false)
        };
        let entity = self
            .entities
            .alloc_resolved(name, EntityKind::Local(local), ty, scope, Span::default());
        self.scopes.insert(scope, name, entity);
        entity
    }
}
