// Catalog entity shapes, matching the upstream normalized JSON (camelCase)
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Gem type as reported by the game data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SkillType {
    Attack,
    Spell,
    Support,
    Minion,
    Buff,
    Banner,
    Mark,
    Warcry,
    Totem,
    Shapeshift,
    #[default]
    Unknown,
}

impl SkillType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "attack" => Self::Attack,
            "spell" => Self::Spell,
            "support" => Self::Support,
            "minion" => Self::Minion,
            "buff" => Self::Buff,
            "banner" => Self::Banner,
            "mark" => Self::Mark,
            "warcry" => Self::Warcry,
            "totem" => Self::Totem,
            "shapeshift" => Self::Shapeshift,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Spell => "Spell",
            Self::Support => "Support",
            Self::Minion => "Minion",
            Self::Buff => "Buff",
            Self::Banner => "Banner",
            Self::Mark => "Mark",
            Self::Warcry => "Warcry",
            Self::Totem => "Totem",
            Self::Shapeshift => "Shapeshift",
            Self::Unknown => "Unknown",
        }
    }

    /// Lowercase form compared against extracted skill-type tags
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Spell => "spell",
            Self::Support => "support",
            Self::Minion => "minion",
            Self::Buff => "buff",
            Self::Banner => "banner",
            Self::Mark => "mark",
            Self::Warcry => "warcry",
            Self::Totem => "totem",
            Self::Shapeshift => "shapeshift",
            Self::Unknown => "unknown",
        }
    }

    /// Attack or Spell
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Attack | Self::Spell)
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unrecognised gem types load as Unknown instead of failing the catalog
impl<'de> Deserialize<'de> for SkillType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Primary character attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Intelligence,
}

impl Attribute {
    /// Parse "str", "Dex", "intelligence", ...
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Some(Self::Strength),
            "dex" | "dexterity" => Some(Self::Dexterity),
            "int" | "intelligence" => Some(Self::Intelligence),
            _ => None,
        }
    }
}

/// Gem attribute requirements, each 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeRequirements {
    #[serde(rename = "str")]
    pub strength: u32,
    #[serde(rename = "dex")]
    pub dexterity: u32,
    #[serde(rename = "int")]
    pub intelligence: u32,
}

impl AttributeRequirements {
    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
        }
    }

    pub fn values(&self) -> [u32; 3] {
        [self.strength, self.dexterity, self.intelligence]
    }
}

/// Skill or support gem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub skill_type: SkillType,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display text, e.g. "Attack, AoE, Melee, Slam"
    #[serde(default)]
    pub tag_string: String,
    #[serde(default)]
    pub requirements: AttributeRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_requirements: Option<String>,
    #[serde(default)]
    pub tier: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gem_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemVariant {
    pub name: String,
    #[serde(default)]
    pub mods: Vec<String>,
}

/// Skill granted by an item, e.g. "Grants Skill: Level (1-20) Lightning Bolt"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGrant {
    pub skill_name: String,
    pub min_level: u32,
    pub max_level: u32,
}

/// "+N to Level of all X Skills"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevelBoost {
    /// e.g. ["fire"], or ["all"]
    pub skill_types: Vec<String>,
    pub bonus: i32,
}

/// Effect gated on a trigger such as "when_ignited" or "on_kill"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalMod {
    pub condition: String,
    pub effect: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub base_type: String,
    pub item_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub variants: Vec<ItemVariant>,
    #[serde(default)]
    pub implicits: Vec<String>,
    #[serde(default)]
    pub explicits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub granted_skills: Vec<SkillGrant>,
    #[serde(default)]
    pub skill_level_boosts: Vec<SkillLevelBoost>,
    #[serde(default)]
    pub conditional_mods: Vec<ConditionalMod>,
}

impl UniqueItem {
    /// Every mod line: implicits, explicits, then variant mods
    pub fn all_mods(&self) -> impl Iterator<Item = &str> {
        self.implicits
            .iter()
            .chain(self.explicits.iter())
            .chain(self.variants.iter().flat_map(|v| v.mods.iter()))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub stats: Vec<String>,
    #[serde(default)]
    pub is_notable: bool,
    #[serde(default)]
    pub is_keystone: bool,
    #[serde(default)]
    pub is_mastery: bool,
    #[serde(default)]
    pub is_jewel_socket: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendancy_name: Option<String>,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PassiveNode {
    /// Notables and keystones are the only nodes worth recommending
    pub fn is_significant(&self) -> bool {
        self.is_notable || self.is_keystone
    }

    pub fn belongs_to(&self, ascendancy: &str) -> bool {
        self.ascendancy_name.as_deref() == Some(ascendancy)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneSlot {
    #[serde(default)]
    pub stats: Vec<String>,
}

/// Socketable rune: slot name -> stat lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rune {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, RuneSlot>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Rune {
    pub fn stats_for(&self, slot: &str) -> &[String] {
        self.slots
            .get(slot)
            .map(|s| s.stats.as_slice())
            .unwrap_or(&[])
    }

    pub fn all_stats(&self) -> impl Iterator<Item = &str> {
        self.slots
            .values()
            .flat_map(|s| s.stats.iter())
            .map(String::as_str)
    }
}
