// Static character class table
use serde::Serialize;

use crate::catalog::types::Attribute;

/// Playable class with its ascendancies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterClass {
    pub name: &'static str,
    /// Attribute label, e.g. "Str/Dex"
    pub attribute: &'static str,
    pub ascendancies: &'static [&'static str],
    pub description: &'static str,
    pub mechanic: &'static str,
}

impl CharacterClass {
    /// Attributes named by the class label ("Dex/Int" -> [Dexterity, Intelligence])
    pub fn attributes(&self) -> Vec<Attribute> {
        parse_attribute_label(self.attribute)
    }

    pub fn has_ascendancy(&self, name: &str) -> bool {
        self.ascendancies
            .iter()
            .any(|a| a.eq_ignore_ascii_case(name))
    }
}

pub const CLASSES: &[CharacterClass] = &[
    CharacterClass {
        name: "Warrior",
        attribute: "Strength",
        ascendancies: &["Titan", "Warbringer"],
        description: "A disciplined fighter mastering heavy weapons and ancestral calls.",
        mechanic: "Slam Skills & Totems",
    },
    CharacterClass {
        name: "Ranger",
        attribute: "Dexterity",
        ascendancies: &["Deadeye", "Pathfinder"],
        description: "Master of the bow and nature, striking from a distance.",
        mechanic: "Mark Skills & Flasks",
    },
    CharacterClass {
        name: "Sorceress",
        attribute: "Intelligence",
        ascendancies: &["Stormweaver", "Chronomancer"],
        description: "Wielder of pure elemental destruction and time manipulation.",
        mechanic: "Elemental Ailments & Cast Speed",
    },
    CharacterClass {
        name: "Mercenary",
        attribute: "Str/Dex",
        ascendancies: &["Witchhunter", "Gemling Legionnaire"],
        description: "A soldier of fortune using crossbows and innovative grenades.",
        mechanic: "Ammo Types & Reload Mechanics",
    },
    CharacterClass {
        name: "Monk",
        attribute: "Dex/Int",
        ascendancies: &["Invoker", "Acolyte of Chayula"],
        description: "A martial artist using quarterstaves and elemental fury.",
        mechanic: "Combo System & Triggered Spells",
    },
    CharacterClass {
        name: "Witch",
        attribute: "Str/Int",
        ascendancies: &["Blood Mage", "Infernalist"],
        description: "Dark caster sacrificing life for power or summoning demons.",
        mechanic: "Life as Resource & Demon Summoning",
    },
];

/// Case-insensitive lookup by class name
pub fn find_class(name: &str) -> Option<&'static CharacterClass> {
    let name = name.trim();
    CLASSES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Split "Str/Dex" style labels; unknown parts are skipped
pub fn parse_attribute_label(label: &str) -> Vec<Attribute> {
    label.split('/').filter_map(Attribute::parse).collect()
}
