use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::menu::{IconGroup, MenuView, Point, RadialMenuController, SpriteName};
use async_channel::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

pub const FRAME_RATE: f64 = 60.0;

/// Reports every collaborator write to the log; stands in for a renderer.
#[derive(Debug, Default)]
pub struct LogView;

impl MenuView for LogView {
    fn set_label(&mut self, text: &str) {
        log::debug!("label: {}", text);
    }

    fn set_slot_sprite(&mut self, slot: usize, sprite: &SpriteName) {
        log::trace!("slot {} sprite {}", slot, sprite);
    }

    fn set_slot_position(&mut self, slot: usize, position: Point) {
        log::trace!("slot {} at ({:.1}, {:.1})", slot, position.x, position.y);
    }

    fn set_slot_scale(&mut self, slot: usize, scale: f64) {
        log::trace!("slot {} scale {:.3}", slot, scale);
    }

    fn set_slot_active(&mut self, slot: usize, active: bool) {
        log::trace!("slot {} active {}", slot, active);
    }

    fn set_ring_rotation(&mut self, degrees: f64) {
        log::trace!("ring rotation {:.2}", degrees);
    }

    fn set_window_alpha(&mut self, alpha: f64) {
        log::trace!("window alpha {:.3}", alpha);
    }

    fn set_window_interactable(&mut self, interactable: bool) {
        log::trace!("window interactable {}", interactable);
    }

    fn set_button_scale(&mut self, scale: f64) {
        log::trace!("button scale {:.3}", scale);
    }

    fn set_panel_active(&mut self, slot: usize, active: bool) {
        log::trace!("panel {} active {}", slot, active);
    }

    fn set_panel_icon_offset(&mut self, slot: usize, group: IconGroup, icon: usize, offset: f64) {
        log::trace!("panel {} {} icon {} offset {:.1}", slot, group, icon, offset);
    }
}

pub struct Host {
    menu: RadialMenuController<LogView>,
}

impl Host {
    pub fn new(config: &Config) -> Self {
        Self {
            menu: Self::build_menu(config),
        }
    }

    fn build_menu(config: &Config) -> RadialMenuController<LogView> {
        let mut menu = RadialMenuController::from_config(config, LogView);
        let names: Vec<String> = config.skills.iter().map(|s| s.name.clone()).collect();
        menu.on_skill_changed(move |index| {
            let name = names.get(index).map(String::as_str).unwrap_or("?");
            log::info!("Skill changed to {} ({})", index, name);
        });
        menu
    }

    pub fn menu(&self) -> &RadialMenuController<LogView> {
        &self.menu
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Toggle => self.menu.toggle_window(),
            AppEvent::Open => self.menu.open_window(),
            AppEvent::Close => self.menu.close_window(),
            AppEvent::Select(index) => self.menu.select_skill(index, false),
            AppEvent::Click(index) => self.menu.on_click(index),
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => self.reload(&new_config),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    /// Rebuilds the menu, reopening it when it was open.
    pub fn reload(&mut self, config: &Config) {
        let was_open = self.menu.is_open();
        self.menu = Self::build_menu(config);
        if was_open {
            self.menu.open_window();
        }
        log::info!("Configuration reloaded");
    }

    pub fn tick(&mut self, dt: f64) {
        self.menu.tick(dt);
    }

    /// Runs until the event channel closes.
    pub fn run(mut self, rx: Receiver<AppEvent>) {
        let frame = Duration::from_secs_f64(1.0 / FRAME_RATE);
        let mut last = Instant::now();

        loop {
            loop {
                match rx.try_recv() {
                    Ok(event) => self.handle(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Closed) => {
                        log::info!("Event channel closed, shutting down");
                        return;
                    }
                }
            }

            let now = Instant::now();
            self.tick(now.duration_since(last).as_secs_f64());
            last = now;

            if let Some(rest) = frame.checked_sub(now.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host::new(&config::bundled_config().unwrap())
    }

    #[test]
    fn test_events_drive_menu() {
        let mut host = host();
        host.handle(AppEvent::Toggle);
        assert!(host.menu().is_open());

        host.handle(AppEvent::Select(2));
        assert_eq!(host.menu().selected(), 2);

        host.handle(AppEvent::Close);
        assert!(!host.menu().is_open());

        host.handle(AppEvent::Click(1));
        assert!(host.menu().is_open());
        assert_eq!(host.menu().selected(), 1);
    }

    #[test]
    fn test_reload_keeps_window_open() {
        let mut host = host();
        host.handle(AppEvent::Open);
        for _ in 0..60 {
            host.tick(1.0 / FRAME_RATE);
        }

        let mut config = config::bundled_config().unwrap();
        config.skills.truncate(2);
        host.reload(&config);

        assert_eq!(host.menu().slots().len(), 2);
        assert!(host.menu().is_open());
    }

    #[test]
    fn test_run_stops_when_channel_closes() {
        let (tx, rx) = async_channel::bounded(4);
        tx.send_blocking(AppEvent::Open).unwrap();
        drop(tx);
        host().run(rx);
    }
}
