use crate::model::{Basement, Spot};
use serde::{Deserialize, Serialize};

/// Spots per section window.
pub const SECTION_SIZE: usize = 24;

const BASEMENT_1_STREETS: [&str; 9] = [
    "IJARAH AVENUE(VIP)",
    "FIRST STREET(VIP)",
    "LORATO NTAKHWANA AVENUE",
    "FUN STREET",
    "LESEDI STREET",
    "BOOGEYMAN STREET",
    "WALK OF FAME AVENUE",
    "MODIRI STREET",
    "KGWARI AVENUE",
];

const BASEMENT_2_STREETS: [&str; 7] = [
    "BANK ON WHEELS STREET",
    "MOGWEBI STREET",
    "*174# AVENUE",
    "MOEMEDI STREET",
    "FOUNDATION AVENUE",
    "POLOKO AVENUE",
    "HEEIA STREET",
];

/// Ordered street names used to label each basement's sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionNames {
    pub basement_1: Vec<String>,
    pub basement_2: Vec<String>,
}

impl Default for SectionNames {
    fn default() -> Self {
        Self {
            basement_1: BASEMENT_1_STREETS.iter().map(|s| s.to_string()).collect(),
            basement_2: BASEMENT_2_STREETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SectionNames {
    pub fn for_basement(&self, basement: Basement) -> &[String] {
        match basement {
            Basement::One => &self.basement_1,
            Basement::Two => &self.basement_2,
        }
    }
}

/// A labelled, contiguous window of at most [`SECTION_SIZE`] spots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub index: usize,
    pub label: String,
    pub spots: Vec<&'a Spot>,
}

impl Section<'_> {
    pub fn available(&self) -> usize {
        self.spots.iter().filter(|spot| spot.is_free()).count()
    }
}

/// Result of partitioning one basement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition<'a> {
    /// No spot carries the basement's zone token.
    Empty,
    Sections(Vec<Section<'a>>),
}

impl<'a> Partition<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Partition::Empty)
    }

    pub fn sections(&self) -> &[Section<'a>] {
        match self {
            Partition::Empty => &[],
            Partition::Sections(sections) => sections,
        }
    }

    pub fn len(&self) -> usize {
        self.sections().len()
    }
}

/// Spots whose name contains the basement's zone token, in input order.
pub fn basement_spots(spots: &[Spot], basement: Basement) -> Vec<&Spot> {
    spots
        .iter()
        .filter(|spot| spot.in_basement(basement))
        .collect()
}

/// Table name for window `index`, or `Section {index + 1}` past the end.
pub fn section_label(names: &[String], index: usize) -> String {
    if index < names.len() {
        names[index].clone()
    } else {
        format!("Section {}", index + 1)
    }
}

pub fn partition<'a>(spots: &'a [Spot], basement: Basement, names: &SectionNames) -> Partition<'a> {
    let filtered = basement_spots(spots, basement);
    if filtered.is_empty() {
        return Partition::Empty;
    }

    let table = names.for_basement(basement);
    let sections = filtered
        .chunks(SECTION_SIZE)
        .enumerate()
        .map(|(index, window)| Section {
            index,
            label: section_label(table, index),
            spots: window.to_vec(),
        })
        .collect();
    Partition::Sections(sections)
}
