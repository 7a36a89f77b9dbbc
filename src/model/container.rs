use serde::{Deserialize, Serialize};

use crate::define_map;

use super::ids::ContainerId;

/// A stackable container type. Immutable over a plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub width: i64,
    pub depth: i64,
    pub height: i64,
    pub max_weight: i64,
    pub stackable: bool,
    pub max_stack: u32,
}

impl Container {
    /// Deck footprint of a single container, in squared length units.
    pub fn footprint(&self) -> i64 {
        self.width * self.depth
    }

    /// Effective stack factor: a non-stackable container always has a stack
    /// of 1 regardless of what `max_stack` says.
    pub fn effective_max_stack(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }

    /// Stacked deck area consumed by `count` containers of this type.
    pub fn stacked_floor_area(&self, count: u64) -> i64 {
        let stacks = div_ceil_u64(count, self.effective_max_stack() as u64);
        stacks as i64 * self.footprint()
    }
}

/// `ceil(a / b)` for unsigned counts; `b` is assumed non-zero.
pub fn div_ceil_u64(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

define_map!(ContainerId, Container, ContainerMap);
