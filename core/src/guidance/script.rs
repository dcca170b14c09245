use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Straight,
    Right,
    Left,
    Arrive,
}

impl Maneuver {
    pub fn glyph(self) -> &'static str {
        match self {
            Maneuver::Straight => "↑",
            Maneuver::Right => "↱",
            Maneuver::Left => "↰",
            Maneuver::Arrive => "◎",
        }
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Maneuver::Straight => "straight",
            Maneuver::Right => "right",
            Maneuver::Left => "left",
            Maneuver::Arrive => "arrive",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceStep {
    pub instruction: String,
    pub maneuver: Maneuver,
    pub distance: String,
}

impl GuidanceStep {
    pub fn new(instruction: &str, maneuver: Maneuver, distance: &str) -> Self {
        Self {
            instruction: instruction.to_string(),
            maneuver,
            distance: distance.to_string(),
        }
    }
}

/// A fixed sequence of steps, non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceScript {
    steps: Vec<GuidanceStep>,
}

impl GuidanceScript {
    /// Returns `None` for an empty script.
    pub fn new(steps: Vec<GuidanceStep>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self { steps })
        }
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn step(&self, index: usize) -> &GuidanceStep {
        &self.steps[index.min(self.last_index())]
    }

    pub fn steps(&self) -> &[GuidanceStep] {
        &self.steps
    }
}

impl Default for GuidanceScript {
    /// Walk from the entry barrier to a spot on Basement 1.
    fn default() -> Self {
        Self {
            steps: vec![
                GuidanceStep::new("Head straight past the entry barrier", Maneuver::Straight, "50 m"),
                GuidanceStep::new("Turn right onto First Street", Maneuver::Right, "30 m"),
                GuidanceStep::new("Continue straight along Fun Street", Maneuver::Straight, "40 m"),
                GuidanceStep::new("Turn left into Lesedi Street", Maneuver::Left, "15 m"),
                GuidanceStep::new("You have arrived at your spot", Maneuver::Arrive, "0 m"),
            ],
        }
    }
}
