pub mod cluster;
pub mod controller;
pub mod geometry;
pub mod slot;
pub mod view;

pub use cluster::{ClusterSettings, IconClusterAnimator};
pub use controller::{RadialMenuController, TransitionKind, WindowVisual};
pub use geometry::{Point, RingLayout};
pub use slot::{Panel, Placement, SkillSlot, SlotSprites, SpriteName};
pub use view::{ClusterView, IconGroup, MenuView};
