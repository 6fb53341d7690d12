//! Containers: fixed rectangular boxes with one open face (`d = 0`).

mod error;
mod space;

pub use error::SpaceError;
pub use space::ContainerSpace;

use serde::{Deserialize, Serialize};

use crate::Id;

/// A storage container: fixed dimensions, a zone label, and the occupancy
/// state of the items currently placed inside it.
///
/// Containers are created once and never destroyed by the core (§3); the
/// item records themselves live in the global item registry and are looked
/// up by id, never owned by the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub container_id: Id,
    pub zone: String,
    pub width: u32,
    pub depth: u32,
    pub height: u32,
    #[serde(skip)]
    space: ContainerSpace,
}

impl Container {
    pub fn new(container_id: impl Into<Id>, zone: impl Into<String>, w: u32, d: u32, h: u32) -> Self {
        Self {
            container_id: container_id.into(),
            zone: zone.into(),
            width: w,
            depth: d,
            height: h,
            space: ContainerSpace::new(w, d, h),
        }
    }

    pub fn space(&self) -> &ContainerSpace {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut ContainerSpace {
        &mut self.space
    }

    pub fn volume(&self) -> u64 {
        self.width as u64 * self.depth as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_container_has_empty_space() {
        let c = Container::new("c1", "General", 100, 85, 200);
        assert!(c.space().is_empty());
        assert_eq!(c.volume(), 100 * 85 * 200);
    }
}
