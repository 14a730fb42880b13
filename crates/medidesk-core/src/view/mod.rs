//! View tree, addressable regions, and the surface adapter seam.
//!
//! Flows never touch a screen directly. They build [`ViewNode`] trees with
//! the pure functions in [`crate::render`] and hand them to a [`Surface`],
//! which owns the actual mutation of regions.

pub mod html;
pub mod node;
pub mod region;
pub mod surface;

pub use node::{Action, Detail, NoticeLevel, ViewNode};
pub use region::RegionId;
pub use surface::{MemorySurface, Surface};
