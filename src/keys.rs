//! Keyboard layer: raw key presses to intents

use crate::config::SessionConfig;
use crate::intent::Intent;
use tgmd_core::ActionCatalog;

/// Key map for the player, with jump steps taken from the session config
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub jump_step_secs: f64,
    pub precise_step_secs: f64,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            jump_step_secs: 2.0,
            precise_step_secs: 0.04,
        }
    }
}

impl KeyBindings {
    pub fn from_config(session: &SessionConfig) -> Self {
        Self {
            jump_step_secs: session.jump_step_secs,
            precise_step_secs: session.precise_step_secs,
        }
    }

    /// Translate a key press, `None` when the key is unbound.
    ///
    /// `key` uses browser-style names (`" "`, `"ArrowLeft"`, `"Enter"`);
    /// shift turns arrow jumps into precise steps.
    pub fn translate(&self, key: &str, shift: bool, catalog: &ActionCatalog) -> Option<Intent> {
        let step = if shift {
            self.precise_step_secs
        } else {
            self.jump_step_secs
        };

        match key {
            " " => Some(Intent::TogglePlay),
            "[" => Some(Intent::MarkStart),
            "]" => Some(Intent::MarkEnd),
            "Enter" => Some(Intent::SaveSegment),
            "ArrowLeft" => Some(Intent::Jump { delta: -step }),
            "ArrowRight" => Some(Intent::Jump { delta: step }),
            _ => {
                let mut chars = key.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                catalog.by_shortcut_key(c).map(|a| Intent::SelectAction {
                    id: Some(a.id.as_str().to_string()),
                })
            }
        }
    }

    /// Help lines for the player keys
    pub fn describe(&self) -> Vec<String> {
        vec![
            "space       play / pause".to_string(),
            "[           mark start".to_string(),
            "]           mark end".to_string(),
            "enter       save segment".to_string(),
            format!("left/right  jump {}s", self.jump_step_secs),
            format!("shift+arrow jump {}s", self.precise_step_secs),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_player_keys() {
        let keys = KeyBindings::default();
        let catalog = ActionCatalog::tgmd();

        assert_eq!(keys.translate(" ", false, &catalog), Some(Intent::TogglePlay));
        assert_eq!(keys.translate("[", false, &catalog), Some(Intent::MarkStart));
        assert_eq!(keys.translate("]", true, &catalog), Some(Intent::MarkEnd));
        assert_eq!(keys.translate("Enter", false, &catalog), Some(Intent::SaveSegment));
        assert_eq!(
            keys.translate("ArrowLeft", false, &catalog),
            Some(Intent::Jump { delta: -2.0 })
        );
        assert_eq!(
            keys.translate("ArrowRight", true, &catalog),
            Some(Intent::Jump { delta: 0.04 })
        );
    }

    #[test]
    fn test_shortcut_keys_select_actions() {
        let keys = KeyBindings::default();
        let catalog = ActionCatalog::tgmd();

        assert_eq!(
            keys.translate("W", false, &catalog),
            Some(Intent::SelectAction {
                id: Some("overhand_throw".to_string())
            })
        );
        assert_eq!(keys.translate("z", false, &catalog), None);
        assert_eq!(keys.translate("Escape", false, &catalog), None);
        assert_eq!(keys.translate("", false, &catalog), None);
    }

    #[test]
    fn test_steps_follow_config() {
        let config = ConfigBuilder::new().with_jump_step(5.0).with_precise_step(0.5).build();
        let keys = KeyBindings::from_config(&config.session);
        let catalog = ActionCatalog::tgmd();

        assert_eq!(
            keys.translate("ArrowRight", false, &catalog),
            Some(Intent::Jump { delta: 5.0 })
        );
        assert_eq!(
            keys.translate("ArrowLeft", true, &catalog),
            Some(Intent::Jump { delta: -0.5 })
        );
        assert!(keys.describe()[4].contains("5s"));
    }
}
