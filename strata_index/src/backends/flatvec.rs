// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend: linear scans over every slot.

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat list of boxes. Queries touch every slot.
#[derive(Clone, Debug, Default)]
pub struct FlatVec {
    slots: Vec<Option<Aabb2D>>,
}

impl Backend for FlatVec {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(aabb);
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D, mut f: F) {
        for (slot, aabb) in self.slots.iter().enumerate() {
            if let Some(aabb) = aabb
                && aabb.overlaps(&rect)
            {
                f(slot);
            }
        }
    }
}
