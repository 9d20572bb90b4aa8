// One live task per transition kind; launching replaces only the task of the same kind.

use super::geometry::{Point, RingLayout};
use super::slot::{Placement, SkillSlot};
use super::view::{MenuView, PanelView};
use crate::anim::{Timeline, Wait, clamp_duration, lerp, lerp_angle, smooth_step};
use crate::config::{Config, LayoutConfig, TimingConfig, WindowConfig};
use strum::{Display, EnumIter};

/// Share of the outgoing panel's retract time to wait before the next panel takes over.
const PANEL_HANDOVER: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TransitionKind {
    Window,
    Ring,
    Rotation,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowVisual {
    pub alpha: f64,
    pub button_scale: f64,
    pub interactable: bool,
    pub blocks_input: bool,
}

#[derive(Debug)]
struct WindowFade {
    open: bool,
    from_alpha: f64,
    to_alpha: f64,
    from_scale: f64,
    to_scale: f64,
    alpha_duration: f64,
    scale_duration: f64,
    timeline: Timeline,
}

#[derive(Debug)]
struct RingMorph {
    expand: bool,
    starts: Vec<Placement>,
    timeline: Timeline,
}

#[derive(Debug)]
struct Rotation {
    from: f64,
    to: f64,
    remember: bool,
    timeline: Timeline,
}

#[derive(Debug)]
enum PanelSequence {
    /// The outgoing panel is retracting; hand over once `hold` expires.
    Retract {
        previous: usize,
        next: usize,
        hold: Wait,
    },
    /// The panel is active and snapped closed; it expands on the next tick.
    Expand { slot: usize },
}

#[derive(Debug, Default)]
struct Transitions {
    window: Option<WindowFade>,
    ring: Option<RingMorph>,
    rotation: Option<Rotation>,
    panel: Option<PanelSequence>,
}

impl Transitions {
    fn cancel(&mut self, kind: TransitionKind) {
        let cancelled = match kind {
            TransitionKind::Window => self.window.take().is_some(),
            TransitionKind::Ring => self.ring.take().is_some(),
            TransitionKind::Rotation => self.rotation.take().is_some(),
            TransitionKind::Panel => self.panel.take().is_some(),
        };
        if cancelled {
            log::trace!("cancelled {} transition", kind);
        }
    }

    fn is_running(&self, kind: TransitionKind) -> bool {
        match kind {
            TransitionKind::Window => self.window.is_some(),
            TransitionKind::Ring => self.ring.is_some(),
            TransitionKind::Rotation => self.rotation.is_some(),
            TransitionKind::Panel => self.panel.is_some(),
        }
    }
}

pub struct RadialMenuController<V: MenuView> {
    layout_config: LayoutConfig,
    timings: TimingConfig,
    window_config: WindowConfig,
    slots: Vec<SkillSlot>,
    layout: RingLayout,
    selected: usize,
    window_open: bool,
    initial_panel_shown: bool,
    window: WindowVisual,
    rotation: f64,
    saved_rotation: f64,
    transitions: Transitions,
    listeners: Vec<Box<dyn FnMut(usize)>>,
    view: V,
}

impl<V: MenuView> RadialMenuController<V> {
    pub fn init_slots(config: &Config) -> Vec<SkillSlot> {
        config.skills.iter().map(SkillSlot::from_config).collect()
    }

    pub fn from_config(config: &Config, view: V) -> Self {
        Self::new(Self::init_slots(config), config, view)
    }

    /// Builds the menu hidden and collapsed, with the default skill silently selected.
    pub fn new(slots: Vec<SkillSlot>, config: &Config, view: V) -> Self {
        let layout = RingLayout::new(
            slots.len(),
            config.layout.radius,
            config.layout.angle_offset,
        );
        let selected = config.default_skill.min(slots.len().saturating_sub(1));

        let mut menu = Self {
            layout_config: config.layout.clone(),
            timings: config.timings.clone(),
            window_config: config.window.clone(),
            saved_rotation: layout.rotation_for(selected),
            slots,
            layout,
            selected,
            window_open: false,
            initial_panel_shown: false,
            window: WindowVisual {
                alpha: 0.0,
                button_scale: config.window.closed_scale,
                interactable: false,
                blocks_input: false,
            },
            rotation: 0.0,
            transitions: Transitions::default(),
            listeners: Vec::new(),
            view,
        };

        menu.set_window_visible(false, true);
        menu.view.set_button_scale(menu.window.button_scale);
        menu.reset_panels();
        menu.select_skill(selected, true);
        menu.snap_ring_collapsed();

        if config.start_open {
            menu.set_window_open(true, true);
        }

        log::debug!(
            "menu ready with {} slots, skill {} selected",
            menu.slots.len(),
            menu.selected
        );
        menu
    }

    pub fn on_skill_changed(&mut self, listener: impl FnMut(usize) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn slots(&self) -> &[SkillSlot] {
        &self.slots
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.slots.get(index).map(SkillSlot::placement)
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.window_open
    }

    pub fn window(&self) -> WindowVisual {
        self.window
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn saved_rotation(&self) -> f64 {
        self.saved_rotation
    }

    pub fn is_transitioning(&self, kind: TransitionKind) -> bool {
        self.transitions.is_running(kind)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn toggle_window(&mut self) {
        self.set_window_open(!self.window_open, false);
    }

    pub fn open_window(&mut self) {
        self.set_window_open(true, false);
    }

    pub fn close_window(&mut self) {
        self.set_window_open(false, false);
    }

    /// Slot button entry point: opens the window when needed, then selects.
    pub fn on_click(&mut self, index: usize) {
        if index >= self.slots.len() {
            log::debug!("ignoring click on missing slot {}", index);
            return;
        }
        if !self.window_open {
            self.set_window_open(true, false);
        }
        self.select_skill(index, false);
    }

    pub fn select_skill(&mut self, index: usize, silent: bool) {
        let Some(slot) = self.slots.get(index) else {
            log::debug!("ignoring selection of missing slot {}", index);
            return;
        };
        self.view.set_label(&slot.name);

        let previous = self.selected;
        self.selected = index;
        self.refresh_slot_icons();

        if silent {
            self.activate_panel_snap(index);
            return;
        }
        if index == previous {
            return;
        }

        log::debug!("skill {} -> {}", previous, index);
        self.start_rotate_to_skill(index);
        self.start_panel_switch(previous, index);

        for listener in &mut self.listeners {
            listener(index);
        }
    }

    /// Advances every live transition by one frame of unscaled time.
    pub fn tick(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.step_window(dt);
        self.step_ring(dt);
        self.step_rotation(dt);
        self.step_panel(dt);
        self.step_panels(dt);
    }

    fn set_window_open(&mut self, open: bool, immediate: bool) {
        if self.window_open == open && !immediate {
            return;
        }
        self.window_open = open;
        self.transitions.cancel(TransitionKind::Window);
        log::debug!(
            "{} window{}",
            if open { "opening" } else { "closing" },
            if immediate { " immediately" } else { "" }
        );

        if open {
            self.set_window_visible(true, false);
            self.start_ring(true, immediate);
            let target = self
                .transitions
                .rotation
                .as_ref()
                .filter(|r| r.remember)
                .map_or(self.saved_rotation, |r| r.to);
            self.start_rotate_to(target, immediate, false);
            if !self.initial_panel_shown {
                self.show_initial_panel(immediate);
                self.initial_panel_shown = true;
            }
        } else {
            self.saved_rotation = self
                .transitions
                .rotation
                .as_ref()
                .map_or(self.rotation, |r| r.to);
            self.start_rotate_to(0.0, immediate, false);
            self.start_ring(false, immediate);
        }

        let (to_alpha, to_scale) = if open {
            (1.0, self.window_config.open_scale)
        } else {
            (0.0, self.window_config.closed_scale)
        };

        if immediate {
            self.finish_window(open, to_alpha, to_scale);
            return;
        }

        self.transitions.window = Some(WindowFade {
            open,
            from_alpha: self.window.alpha,
            to_alpha,
            from_scale: self.window.button_scale,
            to_scale,
            alpha_duration: self.timings.fade,
            scale_duration: self.timings.scale,
            timeline: Timeline::new(self.timings.fade),
        });
    }

    fn set_window_visible(&mut self, visible: bool, immediate: bool) {
        self.window.interactable = visible;
        self.window.blocks_input = visible;
        self.view.set_window_interactable(visible);
        self.view.set_window_blocks_input(visible);
        if immediate {
            self.window.alpha = if visible { 1.0 } else { 0.0 };
            self.view.set_window_alpha(self.window.alpha);
        }
    }

    fn apply_window(&mut self, alpha: f64, button_scale: f64) {
        self.window.alpha = alpha;
        self.window.button_scale = button_scale;
        self.view.set_window_alpha(alpha);
        self.view.set_button_scale(button_scale);
    }

    fn finish_window(&mut self, open: bool, alpha: f64, button_scale: f64) {
        self.apply_window(alpha, button_scale);
        if !open {
            self.set_window_visible(false, true);
        }
    }

    /// Alpha is the reference clock; scale runs on the same clock rescaled to its own
    /// duration, or jumps straight to target when the fade has no duration.
    fn step_window(&mut self, dt: f64) {
        let Some(mut fade) = self.transitions.window.take() else {
            return;
        };

        let time = fade.timeline.advance(dt);
        if fade.timeline.finished() {
            self.finish_window(fade.open, fade.to_alpha, fade.to_scale);
            return;
        }

        let alpha = lerp(fade.from_alpha, fade.to_alpha, time.clamp(0.0, 1.0));
        let scale_t = if fade.alpha_duration > 0.0 {
            (time * (fade.alpha_duration / clamp_duration(fade.scale_duration))).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.apply_window(alpha, lerp(fade.from_scale, fade.to_scale, scale_t));
        self.transitions.window = Some(fade);
    }

    fn ring_target(&self, expand: bool, index: usize) -> (Point, f64) {
        let anchor = self.layout.anchor();
        let position = if expand {
            self.layout.position(index).unwrap_or(anchor)
        } else {
            anchor
        };
        let scale = if index == self.selected {
            self.layout_config.selected_scale
        } else if expand {
            self.layout_config.unselected_scale
        } else {
            0.0
        };
        (position, scale)
    }

    fn start_ring(&mut self, expand: bool, immediate: bool) {
        self.transitions.cancel(TransitionKind::Ring);

        // scaling up from zero needs the slot to be visible
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.placement.active = true;
            self.view.set_slot_active(i, true);
        }

        if immediate {
            self.finish_ring(expand);
            return;
        }

        let duration = if expand {
            self.timings.expand
        } else {
            self.timings.collapse
        };
        log::trace!(
            "ring {} over {:.3}s",
            if expand { "expanding" } else { "collapsing" },
            duration
        );
        self.transitions.ring = Some(RingMorph {
            expand,
            starts: self.slots.iter().map(SkillSlot::placement).collect(),
            timeline: Timeline::new(duration),
        });
    }

    fn step_ring(&mut self, dt: f64) {
        let Some(mut morph) = self.transitions.ring.take() else {
            return;
        };

        let t = morph.timeline.advance(dt);
        if morph.timeline.finished() {
            self.finish_ring(morph.expand);
            return;
        }

        let eased = smooth_step(t);
        for (i, start) in morph.starts.iter().enumerate() {
            let (position, scale) = self.ring_target(morph.expand, i);
            let Some(slot) = self.slots.get_mut(i) else {
                continue;
            };
            slot.placement.position = start.position.lerp(position, eased);
            slot.placement.scale = lerp(start.scale, scale, eased);
            self.view.set_slot_position(i, slot.placement.position);
            self.view.set_slot_scale(i, slot.placement.scale);
        }
        self.transitions.ring = Some(morph);
    }

    fn finish_ring(&mut self, expand: bool) {
        for i in 0..self.slots.len() {
            let (position, scale) = self.ring_target(expand, i);
            let active = expand || i == self.selected;
            self.slots[i].placement = Placement {
                position,
                scale,
                active,
            };
            self.view.set_slot_position(i, position);
            self.view.set_slot_scale(i, scale);
            self.view.set_slot_active(i, active);
        }
    }

    fn snap_ring_collapsed(&mut self) {
        self.apply_rotation(0.0);
        self.finish_ring(false);
    }

    fn ring_collapsed(&self) -> bool {
        !self.window_open && !self.transitions.is_running(TransitionKind::Ring)
    }

    fn refresh_slot_icons(&mut self) {
        let collapsed = self.ring_collapsed();
        let selected = self.selected;
        let (selected_scale, unselected_scale) = (
            self.layout_config.selected_scale,
            self.layout_config.unselected_scale,
        );

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let is_selected = i == selected;
            if let Some(sprite) = slot.sprites.pick(is_selected) {
                self.view.set_slot_sprite(i, sprite);
            }

            slot.placement.scale = if is_selected {
                selected_scale
            } else {
                unselected_scale
            };
            self.view.set_slot_scale(i, slot.placement.scale);

            // a closed ring only ever shows the selected slot
            if collapsed {
                slot.placement.active = is_selected;
                self.view.set_slot_active(i, is_selected);
            }
        }
    }

    fn apply_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
        self.view.set_ring_rotation(degrees);
    }

    fn start_rotate_to(&mut self, target: f64, immediate: bool, remember: bool) {
        self.transitions.cancel(TransitionKind::Rotation);

        if immediate {
            self.apply_rotation(target);
            if remember {
                self.saved_rotation = target;
            }
            return;
        }

        self.transitions.rotation = Some(Rotation {
            from: self.rotation,
            to: target,
            remember,
            timeline: Timeline::new(self.timings.rotation),
        });
    }

    fn start_rotate_to_skill(&mut self, index: usize) {
        let target = self.layout.rotation_for(index);
        self.start_rotate_to(target, false, true);
    }

    fn step_rotation(&mut self, dt: f64) {
        let Some(mut rotation) = self.transitions.rotation.take() else {
            return;
        };

        let t = rotation.timeline.advance(dt);
        if rotation.timeline.finished() {
            self.apply_rotation(rotation.to);
            if rotation.remember {
                self.saved_rotation = rotation.to;
            }
            return;
        }

        self.apply_rotation(lerp_angle(rotation.from, rotation.to, smooth_step(t)));
        self.transitions.rotation = Some(rotation);
    }

    fn has_panel(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.panel.is_some())
    }

    /// Hiding a panel also halts its icons.
    fn set_panel_active(&mut self, slot: usize, active: bool) {
        let Some(panel) = self.slots.get_mut(slot).and_then(|s| s.panel.as_mut()) else {
            return;
        };
        panel.active = active;
        if !active {
            panel.animator.stop();
        }
        self.view.set_panel_active(slot, active);
    }

    fn snap_panel(&mut self, slot: usize, opened: bool) {
        let Some(panel) = self.slots.get_mut(slot).and_then(|s| s.panel.as_mut()) else {
            return;
        };
        let mut view = PanelView::new(slot, &mut self.view);
        if opened {
            panel.animator.snap_opened(&mut view);
        } else {
            panel.animator.snap_closed(&mut view);
        }
    }

    fn reset_panels(&mut self) {
        for i in 0..self.slots.len() {
            if self.has_panel(i) {
                self.set_panel_active(i, true);
                self.snap_panel(i, false);
                self.set_panel_active(i, false);
            }
        }
    }

    /// Shows only `index`'s panel, closed, with no animation.
    fn activate_panel_snap(&mut self, index: usize) {
        self.transitions.cancel(TransitionKind::Panel);
        for i in 0..self.slots.len() {
            if !self.has_panel(i) {
                continue;
            }
            let active = i == index;
            self.set_panel_active(i, active);
            if active {
                self.snap_panel(i, false);
            }
        }
    }

    /// A cancelled handover may have left its outgoing panel up.
    fn hide_panels_except(&mut self, keep: &[usize]) {
        for i in 0..self.slots.len() {
            let stale =
                !keep.contains(&i) && self.slots[i].panel.as_ref().is_some_and(|p| p.active);
            if stale {
                self.set_panel_active(i, false);
            }
        }
    }

    fn show_initial_panel(&mut self, immediate: bool) {
        self.transitions.cancel(TransitionKind::Panel);
        let slot = self.selected;
        self.hide_panels_except(&[slot]);

        if !self.has_panel(slot) {
            return;
        }

        self.set_panel_active(slot, true);
        if immediate {
            self.snap_panel(slot, true);
        } else {
            self.snap_panel(slot, false);
            self.transitions.panel = Some(PanelSequence::Expand { slot });
        }
    }

    fn start_panel_switch(&mut self, previous: usize, next: usize) {
        if previous == next {
            self.activate_panel_snap(next);
            return;
        }
        self.transitions.cancel(TransitionKind::Panel);
        self.hide_panels_except(&[previous, next]);

        let retract = self
            .slots
            .get_mut(previous)
            .and_then(|s| s.panel.as_mut())
            .filter(|panel| panel.active)
            .map(|panel| {
                panel.animator.animate_in();
                panel.animator.total_in_time()
            });

        self.transitions.panel = match retract {
            Some(total) => Some(PanelSequence::Retract {
                previous,
                next,
                hold: Wait::Seconds(total * PANEL_HANDOVER),
            }),
            None => self.begin_panel_expand(next),
        };
    }

    fn begin_panel_expand(&mut self, slot: usize) -> Option<PanelSequence> {
        if !self.has_panel(slot) {
            return None;
        }
        self.set_panel_active(slot, true);
        self.snap_panel(slot, false);
        Some(PanelSequence::Expand { slot })
    }

    fn step_panel(&mut self, dt: f64) {
        let Some(sequence) = self.transitions.panel.take() else {
            return;
        };

        match sequence {
            PanelSequence::Retract {
                previous,
                next,
                mut hold,
            } => {
                if hold.poll(dt) {
                    self.set_panel_active(previous, false);
                    self.transitions.panel = self.begin_panel_expand(next);
                } else {
                    self.transitions.panel = Some(PanelSequence::Retract {
                        previous,
                        next,
                        hold,
                    });
                }
            }
            PanelSequence::Expand { slot } => {
                if let Some(panel) = self.slots.get_mut(slot).and_then(|s| s.panel.as_mut()) {
                    panel.animator.animate_out();
                }
            }
        }
    }

    fn step_panels(&mut self, dt: f64) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(panel) = slot.panel.as_mut()
                && panel.active
            {
                panel.animator.tick(dt, &mut PanelView::new(i, &mut self.view));
            }
        }
    }
}
