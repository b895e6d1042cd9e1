//! Fixed TGMD-3 action vocabulary

use crate::{AnnotationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// TGMD-3 motor-skill categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Run,
    Gallop,
    Hop,
    Skip,
    HorizontalJump,
    Slide,
    StrikeTwoHands,
    StrikeOneHand,
    DribbleOneHand,
    CatchTwoHands,
    Kick,
    OverhandThrow,
    UnderhandThrow,
}

impl ActionId {
    /// Every category in canonical report order
    pub const ALL: [ActionId; 13] = [
        ActionId::Run,
        ActionId::Gallop,
        ActionId::Hop,
        ActionId::Skip,
        ActionId::HorizontalJump,
        ActionId::Slide,
        ActionId::StrikeTwoHands,
        ActionId::StrikeOneHand,
        ActionId::DribbleOneHand,
        ActionId::CatchTwoHands,
        ActionId::Kick,
        ActionId::OverhandThrow,
        ActionId::UnderhandThrow,
    ];

    /// Stable key used in exports and scripts
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Run => "run",
            ActionId::Gallop => "gallop",
            ActionId::Hop => "hop",
            ActionId::Skip => "skip",
            ActionId::HorizontalJump => "horizontal_jump",
            ActionId::Slide => "slide",
            ActionId::StrikeTwoHands => "strike_two_hands",
            ActionId::StrikeOneHand => "strike_one_hand",
            ActionId::DribbleOneHand => "dribble_one_hand",
            ActionId::CatchTwoHands => "catch_two_hands",
            ActionId::Kick => "kick",
            ActionId::OverhandThrow => "overhand_throw",
            ActionId::UnderhandThrow => "underhand_throw",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self> {
        ActionId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AnnotationError::UnknownAction(s.to_string()))
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: ActionId,

    /// Display label
    pub label: String,

    /// Presentation color (hex)
    pub color: String,

    /// Optional single-key binding
    pub shortcut_key: Option<char>,
}

impl ActionDefinition {
    pub fn new(id: ActionId, label: &str, color: &str, shortcut_key: Option<char>) -> Self {
        Self {
            id,
            label: label.to_string(),
            color: color.to_string(),
            shortcut_key,
        }
    }
}

/// Ordered, immutable registry of action definitions
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    actions: Vec<ActionDefinition>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::tgmd()
    }
}

impl ActionCatalog {
    /// The standard 13-entry TGMD-3 catalog
    pub fn tgmd() -> Self {
        let actions = vec![
            ActionDefinition::new(ActionId::Run, "Correr (Run)", "#2563eb", Some('1')),
            ActionDefinition::new(ActionId::Gallop, "Galope (Gallop)", "#16a34a", Some('2')),
            ActionDefinition::new(ActionId::Hop, "Saltar en un pie (Hop)", "#d946ef", Some('3')),
            ActionDefinition::new(ActionId::Skip, "Salto indio (Skip)", "#f97316", Some('4')),
            ActionDefinition::new(
                ActionId::HorizontalJump,
                "Saltar con ambos pies (Horizontal jump)",
                "#0891b2",
                Some('5'),
            ),
            ActionDefinition::new(ActionId::Slide, "Deslizarse (Slide)", "#7c3aed", Some('6')),
            ActionDefinition::new(
                ActionId::StrikeTwoHands,
                "Golpear con ambas manos (Strike two hands)",
                "#dc2626",
                Some('7'),
            ),
            ActionDefinition::new(
                ActionId::StrikeOneHand,
                "Golpear con una mano (Strike one hand)",
                "#f59e0b",
                Some('8'),
            ),
            ActionDefinition::new(
                ActionId::DribbleOneHand,
                "Rebotar con una mano (Dribble one hand)",
                "#0ea5e9",
                Some('9'),
            ),
            ActionDefinition::new(
                ActionId::CatchTwoHands,
                "Atrapar con ambas manos (Catch two hands)",
                "#84cc16",
                Some('0'),
            ),
            ActionDefinition::new(ActionId::Kick, "Patear (Kick)", "#c026d3", Some('q')),
            ActionDefinition::new(
                ActionId::OverhandThrow,
                "Lanzar por encima (Overhand throw)",
                "#14b8a6",
                Some('w'),
            ),
            ActionDefinition::new(
                ActionId::UnderhandThrow,
                "Lanzar por debajo (Underhand throw)",
                "#f43f5e",
                Some('e'),
            ),
        ];

        Self { actions }
    }

    /// Build a catalog from custom definitions, rejecting duplicate ids or shortcut keys
    pub fn new(actions: Vec<ActionDefinition>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();

        for action in &actions {
            if !ids.insert(action.id) {
                return Err(AnnotationError::Catalog(format!("duplicate action id: {}", action.id)));
            }
            if let Some(key) = action.shortcut_key {
                if !keys.insert(key.to_ascii_lowercase()) {
                    return Err(AnnotationError::Catalog(format!(
                        "shortcut key '{}' bound to more than one action",
                        key
                    )));
                }
            }
        }

        Ok(Self { actions })
    }

    /// All definitions in canonical order
    pub fn all(&self) -> &[ActionDefinition] {
        &self.actions
    }

    pub fn by_id(&self, id: ActionId) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Look up the action bound to a key; keys are matched case-insensitively
    pub fn by_shortcut_key(&self, key: char) -> Option<&ActionDefinition> {
        let key = key.to_ascii_lowercase();
        self.actions
            .iter()
            .find(|a| a.shortcut_key.map(|k| k.to_ascii_lowercase()) == Some(key))
    }

    /// Resolve a loosely typed id string against this catalog
    pub fn resolve(&self, raw: &str) -> Option<&ActionDefinition> {
        raw.trim().parse::<ActionId>().ok().and_then(|id| self.by_id(id))
    }

    /// Display label for an id, falling back to the raw key
    pub fn label_for(&self, id: ActionId) -> &str {
        self.by_id(id).map(|a| a.label.as_str()).unwrap_or(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
