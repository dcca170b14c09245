use crate::guidance::script::{GuidanceScript, Maneuver};

/// Position in the script and whether the walk is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuidanceState {
    pub index: usize,
    pub active: bool,
}

/// Outcome of one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// Already on the last step; the walk is now inactive.
    Arrived,
    /// Not running, nothing changed.
    Idle,
}

/// Everything needed to draw the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceFrame {
    pub instruction: String,
    pub distance: String,
    pub maneuver: Maneuver,
    pub index: usize,
    pub total: usize,
    /// One entry per step; `true` once reached.
    pub dots: Vec<bool>,
}

impl GuidanceFrame {
    pub fn progress(&self) -> String {
        self.dots
            .iter()
            .map(|&reached| if reached { '●' } else { '○' })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GuidanceSequencer {
    script: GuidanceScript,
    state: GuidanceState,
}

impl GuidanceSequencer {
    pub fn new(script: GuidanceScript) -> Self {
        Self {
            script,
            state: GuidanceState::default(),
        }
    }

    pub fn start(&mut self) {
        self.state = GuidanceState {
            index: 0,
            active: true,
        };
    }

    /// Resets progress; this is not a pause.
    pub fn stop(&mut self) {
        self.state = GuidanceState::default();
    }

    pub fn advance(&mut self) -> Advance {
        if !self.state.active {
            return Advance::Idle;
        }
        if self.state.index < self.script.last_index() {
            self.state.index += 1;
            Advance::Moved(self.state.index)
        } else {
            self.state.active = false;
            Advance::Arrived
        }
    }

    pub fn state(&self) -> GuidanceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn script(&self) -> &GuidanceScript {
        &self.script
    }

    pub fn render(&self) -> GuidanceFrame {
        render_frame(&self.script, self.state.index)
    }
}

impl Default for GuidanceSequencer {
    fn default() -> Self {
        Self::new(GuidanceScript::default())
    }
}

pub fn render_frame(script: &GuidanceScript, index: usize) -> GuidanceFrame {
    let index = index.min(script.last_index());
    let step = script.step(index);
    GuidanceFrame {
        instruction: step.instruction.clone(),
        distance: step.distance.clone(),
        maneuver: step.maneuver,
        index,
        total: script.steps().len(),
        dots: (0..script.steps().len()).map(|dot| dot <= index).collect(),
    }
}
