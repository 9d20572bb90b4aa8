use super::cluster::IconClusterAnimator;
use super::geometry::Point;
use crate::config::SkillConfig;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SpriteName(String);

crate::impl_string_newtype!(SpriteName);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotSprites {
    pub active: Option<SpriteName>,
    pub inactive: Option<SpriteName>,
}

impl SlotSprites {
    pub fn pick(&self, selected: bool) -> Option<&SpriteName> {
        if selected {
            self.active.as_ref()
        } else {
            self.inactive.as_ref()
        }
    }
}

/// Where a slot currently is on screen, as last written by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub position: Point,
    pub scale: f64,
    pub active: bool,
}

/// A slot's detail panel together with its visibility.
#[derive(Debug, Clone)]
pub struct Panel {
    pub(crate) animator: IconClusterAnimator,
    pub(crate) active: bool,
}

impl Panel {
    pub fn new(animator: IconClusterAnimator) -> Self {
        Self {
            animator,
            active: false,
        }
    }

    pub fn animator(&self) -> &IconClusterAnimator {
        &self.animator
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone)]
pub struct SkillSlot {
    pub name: String,
    pub sprites: SlotSprites,
    pub(crate) panel: Option<Panel>,
    pub(crate) placement: Placement,
}

impl SkillSlot {
    pub fn new(
        name: impl Into<String>,
        sprites: SlotSprites,
        panel: Option<IconClusterAnimator>,
    ) -> Self {
        Self {
            name: name.into(),
            sprites,
            panel: panel.map(Panel::new),
            placement: Placement::default(),
        }
    }

    pub fn from_config(cfg: &SkillConfig) -> Self {
        let sprites = SlotSprites {
            active: cfg.active_icon.clone(),
            inactive: cfg.inactive_icon.clone(),
        };
        let panel = cfg.panel.as_ref().map(IconClusterAnimator::from_config);
        Self::new(cfg.name.clone(), sprites, panel)
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    #[test]
    fn test_sprites_are_independent() {
        let mut cfg = SkillConfig {
            name: "Frost".into(),
            active_icon: Some(SpriteName::new("frost-on")),
            inactive_icon: None,
            panel: None,
        };
        let slot = SkillSlot::from_config(&cfg);
        assert_eq!(slot.sprites.pick(true).map(|s| s.as_str()), Some("frost-on"));
        assert_eq!(slot.sprites.pick(false), None);

        cfg.inactive_icon = Some(SpriteName::new("frost-off"));
        let slot = SkillSlot::from_config(&cfg);
        assert_eq!(slot.sprites.pick(false).map(|s| s.as_str()), Some("frost-off"));
    }

    #[test]
    fn test_panel_starts_hidden() {
        let cfg = SkillConfig {
            name: "Bolt".into(),
            active_icon: None,
            inactive_icon: None,
            panel: Some(PanelConfig::default()),
        };
        let slot = SkillSlot::from_config(&cfg);
        assert!(!slot.panel().unwrap().is_active());
        assert_eq!(slot.placement(), Placement::default());
    }
}
