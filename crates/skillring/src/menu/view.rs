use super::geometry::Point;
use super::slot::SpriteName;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum IconGroup {
    Top,
    Bottom,
}

pub trait ClusterView {
    fn set_icon_offset(&mut self, group: IconGroup, index: usize, offset: f64);
}

impl ClusterView for () {
    fn set_icon_offset(&mut self, _group: IconGroup, _index: usize, _offset: f64) {}
}

/// Records every write in order.
impl ClusterView for Vec<(IconGroup, usize, f64)> {
    fn set_icon_offset(&mut self, group: IconGroup, index: usize, offset: f64) {
        self.push((group, index, offset));
    }
}

#[allow(unused_variables)]
pub trait MenuView {
    fn set_label(&mut self, text: &str) {}
    fn set_slot_sprite(&mut self, slot: usize, sprite: &SpriteName) {}
    fn set_slot_position(&mut self, slot: usize, position: Point) {}
    fn set_slot_scale(&mut self, slot: usize, scale: f64) {}
    fn set_slot_active(&mut self, slot: usize, active: bool) {}
    fn set_ring_rotation(&mut self, degrees: f64) {}
    fn set_window_alpha(&mut self, alpha: f64) {}
    fn set_window_interactable(&mut self, interactable: bool) {}
    fn set_window_blocks_input(&mut self, blocks: bool) {}
    fn set_button_scale(&mut self, scale: f64) {}
    fn set_panel_active(&mut self, slot: usize, active: bool) {}
    fn set_panel_icon_offset(&mut self, slot: usize, group: IconGroup, icon: usize, offset: f64) {}
}

impl MenuView for () {}

/// Routes one slot's panel writes into the menu view.
pub(crate) struct PanelView<'a, V> {
    slot: usize,
    view: &'a mut V,
}

impl<'a, V: MenuView> PanelView<'a, V> {
    pub(crate) fn new(slot: usize, view: &'a mut V) -> Self {
        Self { slot, view }
    }
}

impl<V: MenuView> ClusterView for PanelView<'_, V> {
    fn set_icon_offset(&mut self, group: IconGroup, index: usize, offset: f64) {
        self.view
            .set_panel_icon_offset(self.slot, group, index, offset);
    }
}
