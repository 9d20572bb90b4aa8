//! Staggered slide animation for a panel's two icon groups.

use super::view::{ClusterView, IconGroup};
use crate::anim::{Easing, Timeline, Wait, lerp};
use crate::config::PanelConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSettings {
    pub move_duration: f64,
    pub stagger_delay: f64,
    pub top_offset: f64,
    pub bottom_offset: f64,
    pub easing: Easing,
}

impl From<&PanelConfig> for ClusterSettings {
    fn from(cfg: &PanelConfig) -> Self {
        Self {
            move_duration: cfg.move_duration,
            stagger_delay: cfg.stagger_delay,
            top_offset: cfg.top_offset,
            bottom_offset: cfg.bottom_offset,
            easing: cfg.easing,
        }
    }
}

#[derive(Debug, Clone)]
struct IconMove {
    group: IconGroup,
    index: usize,
    from: f64,
    to: f64,
    timeline: Timeline,
}

#[derive(Debug, Clone)]
struct Dispatch {
    outward: bool,
    next: usize,
    wait: Wait,
}

#[derive(Debug, Clone)]
pub struct IconClusterAnimator {
    settings: ClusterSettings,
    top: Vec<f64>,
    bottom: Vec<f64>,
    dispatch: Option<Dispatch>,
    moves: Vec<IconMove>,
}

impl IconClusterAnimator {
    pub fn new(top_icons: usize, bottom_icons: usize, settings: ClusterSettings) -> Self {
        Self {
            settings,
            top: vec![0.0; top_icons],
            bottom: vec![0.0; bottom_icons],
            dispatch: None,
            moves: Vec::new(),
        }
    }

    pub fn from_config(cfg: &PanelConfig) -> Self {
        Self::new(cfg.top_icons, cfg.bottom_icons, cfg.into())
    }

    pub fn offsets(&self, group: IconGroup) -> &[f64] {
        match group {
            IconGroup::Top => &self.top,
            IconGroup::Bottom => &self.bottom,
        }
    }

    pub fn offset(&self, group: IconGroup, index: usize) -> Option<f64> {
        self.offsets(group).get(index).copied()
    }

    fn icon_count(&self) -> usize {
        self.top.len().max(self.bottom.len())
    }

    /// Time until the last-launched icon settles.
    pub fn total_out_time(&self) -> f64 {
        self.icon_count().saturating_sub(1) as f64 * self.settings.stagger_delay
            + self.settings.move_duration
    }

    pub fn total_in_time(&self) -> f64 {
        self.icon_count().saturating_sub(1) as f64 * self.settings.stagger_delay
            + self.settings.move_duration
    }

    #[cfg(test)]
    fn is_animating(&self) -> bool {
        self.dispatch.is_some() || !self.moves.is_empty()
    }

    pub fn snap_closed(&mut self, view: &mut impl ClusterView) {
        self.snap(0.0, 0.0, view);
    }

    pub fn snap_opened(&mut self, view: &mut impl ClusterView) {
        self.snap(self.settings.top_offset, self.settings.bottom_offset, view);
    }

    fn snap(&mut self, top: f64, bottom: f64, view: &mut impl ClusterView) {
        self.stop();
        for (group, offsets, value) in [
            (IconGroup::Top, &mut self.top, top),
            (IconGroup::Bottom, &mut self.bottom, bottom),
        ] {
            for (index, offset) in offsets.iter_mut().enumerate() {
                *offset = value;
                view.set_icon_offset(group, index, value);
            }
        }
    }

    pub fn animate_out(&mut self) {
        self.start(true);
    }

    pub fn animate_in(&mut self) {
        self.start(false);
    }

    fn start(&mut self, outward: bool) {
        // Only the dispatch loop restarts; launched moves keep going.
        self.dispatch = Some(Dispatch {
            outward,
            next: 0,
            wait: Wait::Frame,
        });
    }

    /// Halts the dispatch loop and every in-flight move, leaving offsets where they are.
    pub fn stop(&mut self) {
        self.dispatch = None;
        self.moves.clear();
    }

    pub fn tick(&mut self, dt: f64, view: &mut impl ClusterView) {
        self.advance_dispatch(dt);
        self.advance_moves(dt, view);
    }

    fn advance_dispatch(&mut self, dt: f64) {
        let count = self.icon_count();
        let stagger = self.settings.stagger_delay;

        let Some(dispatch) = self.dispatch.as_mut() else {
            return;
        };
        if !dispatch.wait.poll(dt) {
            return;
        }

        let launch = if dispatch.next < count {
            let index = dispatch.next;
            dispatch.next += 1;
            dispatch.wait = Wait::Seconds(stagger);
            Some((index, dispatch.outward))
        } else {
            None
        };

        match launch {
            Some((index, outward)) => {
                if index < self.top.len() {
                    let to = if outward { self.settings.top_offset } else { 0.0 };
                    self.launch(IconGroup::Top, index, to);
                }
                if index < self.bottom.len() {
                    let to = if outward { self.settings.bottom_offset } else { 0.0 };
                    self.launch(IconGroup::Bottom, index, to);
                }
            }
            None => self.dispatch = None,
        }
    }

    fn launch(&mut self, group: IconGroup, index: usize, to: f64) {
        let Some(from) = self.offset(group, index) else {
            return;
        };
        self.moves.push(IconMove {
            group,
            index,
            from,
            to,
            timeline: Timeline::new(self.settings.move_duration),
        });
    }

    fn advance_moves(&mut self, dt: f64, view: &mut impl ClusterView) {
        let easing = self.settings.easing;
        let (top, bottom) = (&mut self.top, &mut self.bottom);

        self.moves.retain_mut(|m| {
            let t = m.timeline.advance(dt);
            let done = m.timeline.finished();
            // exact target on the last frame, whatever the clock step was
            let value = if done {
                m.to
            } else {
                lerp(m.from, m.to, easing.evaluate(t))
            };

            let offsets = match m.group {
                IconGroup::Top => &mut *top,
                IconGroup::Bottom => &mut *bottom,
            };
            if let Some(offset) = offsets.get_mut(m.index) {
                *offset = value;
                view.set_icon_offset(m.group, m.index, value);
            }
            !done
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Binary fractions keep the stagger arithmetic exact.
    const DT: f64 = 0.0625;

    fn settings() -> ClusterSettings {
        ClusterSettings {
            move_duration: 0.25,
            stagger_delay: 0.125,
            top_offset: 120.0,
            bottom_offset: -80.0,
            easing: Easing::SmoothStep,
        }
    }

    fn run(cluster: &mut IconClusterAnimator, ticks: usize) {
        for _ in 0..ticks {
            cluster.tick(DT, &mut ());
        }
    }

    #[test]
    fn test_total_times_match_formula() {
        let cluster = IconClusterAnimator::new(3, 2, settings());
        assert_eq!(cluster.total_out_time(), 2.0 * 0.125 + 0.25);
        assert_eq!(cluster.total_out_time(), cluster.total_in_time());

        let single = IconClusterAnimator::new(1, 0, settings());
        assert_eq!(single.total_in_time(), 0.25);
    }

    #[test]
    fn test_animate_out_staggers_and_lands_exactly() {
        let mut cluster = IconClusterAnimator::new(3, 2, settings());
        cluster.animate_out();
        assert!(cluster.is_animating());

        run(&mut cluster, 1);
        assert!(cluster.offset(IconGroup::Top, 0).unwrap() > 0.0);
        assert!(cluster.offset(IconGroup::Bottom, 0).unwrap() < 0.0);
        assert_eq!(cluster.offset(IconGroup::Top, 1), Some(0.0));

        // second index launches one stagger later
        run(&mut cluster, 1);
        assert_eq!(cluster.offset(IconGroup::Top, 1), Some(0.0));
        run(&mut cluster, 1);
        assert!(cluster.offset(IconGroup::Top, 1).unwrap() > 0.0);
        assert_eq!(cluster.offset(IconGroup::Top, 2), Some(0.0));

        run(&mut cluster, 16);
        assert!(!cluster.is_animating());
        assert_eq!(cluster.offsets(IconGroup::Top), &[120.0, 120.0, 120.0]);
        assert_eq!(cluster.offsets(IconGroup::Bottom), &[-80.0, -80.0]);
    }

    #[test]
    fn test_first_step_runs_on_launch_tick() {
        let mut cluster = IconClusterAnimator::new(
            1,
            0,
            ClusterSettings {
                move_duration: 1.0,
                stagger_delay: 0.0,
                easing: Easing::Linear,
                ..settings()
            },
        );
        cluster.animate_out();
        cluster.tick(0.5, &mut ());
        assert_eq!(cluster.offset(IconGroup::Top, 0), Some(60.0));
    }

    #[test]
    fn test_snap_closed_overrides_in_flight_moves() {
        let mut cluster = IconClusterAnimator::new(3, 2, settings());
        cluster.animate_out();
        run(&mut cluster, 3);

        let mut written: Vec<(IconGroup, usize, f64)> = Vec::new();
        cluster.snap_closed(&mut written);
        assert_eq!(written.len(), 5);
        assert!(written.iter().all(|&(_, _, y)| y == 0.0));
        assert!(!cluster.is_animating());

        run(&mut cluster, 10);
        assert!(cluster.offsets(IconGroup::Top).iter().all(|&y| y == 0.0));
        assert!(cluster.offsets(IconGroup::Bottom).iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_snap_opened_sets_group_offsets() {
        let mut cluster = IconClusterAnimator::new(2, 3, settings());
        cluster.snap_opened(&mut ());
        assert_eq!(cluster.offsets(IconGroup::Top), &[120.0, 120.0]);
        assert_eq!(cluster.offsets(IconGroup::Bottom), &[-80.0, -80.0, -80.0]);
    }

    #[test]
    fn test_retrigger_continues_from_current_offsets() {
        let mut cluster = IconClusterAnimator::new(2, 0, settings());
        cluster.animate_out();
        run(&mut cluster, 2);
        let partial = cluster.offset(IconGroup::Top, 0).unwrap();
        assert!(partial > 0.0 && partial < 120.0);

        cluster.animate_in();
        run(&mut cluster, 1);
        // the outward move is still running alongside the new inward one
        let now = cluster.offset(IconGroup::Top, 0).unwrap();
        assert!(now > 0.0 && now < 120.0);

        run(&mut cluster, 16);
        assert_eq!(cluster.offsets(IconGroup::Top), &[0.0, 0.0]);
        assert!(!cluster.is_animating());
    }

    #[test]
    fn test_empty_cluster_is_harmless() {
        let mut cluster = IconClusterAnimator::new(0, 0, settings());
        cluster.animate_out();
        run(&mut cluster, 2);
        assert!(!cluster.is_animating());
        assert_eq!(cluster.total_out_time(), 0.25);
    }
}
