use std::fmt;

/// What kind of stage event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEventKind {
    // Navigation
    /// A scene was loaded into the active container.
    SceneLoaded {
        /// Scene index.
        index: usize,
        /// Scene title.
        title: String,
    },
    /// A navigation request pointed outside the scene list.
    NavigationRejected {
        /// The requested index.
        index: i64,
    },

    // Presentation
    /// A narration overlay appeared.
    Narration {
        /// Narrated text.
        text: String,
    },
    /// A dialogue overlay appeared.
    Dialogue {
        /// Speaking character.
        speaker: String,
        /// Spoken line.
        text: String,
    },
    /// An interactive button appeared.
    ButtonShown {
        /// Button label.
        label: String,
    },
    /// A clip was requested on a model.
    Animation {
        /// Entity name.
        entity: String,
        /// Clip name.
        clip: String,
    },
    /// A tween started moving an entity.
    MoveStarted {
        /// Entity name.
        entity: String,
    },
    /// A tween finished.
    MoveFinished {
        /// Entity name.
        entity: String,
    },

    // Input
    /// A pointer release selected a registered entity.
    Selected {
        /// Name of the selected entity.
        entity: String,
    },

    // Audio
    /// An audio cue was requested.
    Sound {
        /// Sound asset.
        asset: String,
        /// Playback volume.
        volume: f32,
    },
    /// An audio cue failed and was swallowed.
    SoundFailed {
        /// Sound asset.
        asset: String,
        /// Failure description.
        reason: String,
    },

    // Diagnostics
    /// A scene referenced an entity that does not exist.
    MissingNode {
        /// The missing entity name.
        name: String,
    },
    /// A continuation from a superseded scene was dropped.
    StaleDiscarded {
        /// The generation the continuation belonged to.
        generation: u64,
    },
}

impl fmt::Display for StageEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneLoaded { index, title } => write!(f, "scene {index} loaded: {title}"),
            Self::NavigationRejected { index } => write!(f, "scene index {index} out of bounds"),
            Self::Narration { text } => write!(f, "{text}"),
            Self::Dialogue { speaker, text } => write!(f, "{speaker}: {text}"),
            Self::ButtonShown { label } => write!(f, "[{label}]"),
            Self::Animation { entity, clip } => write!(f, "{entity} plays '{clip}'"),
            Self::MoveStarted { entity } => write!(f, "{entity} starts moving"),
            Self::MoveFinished { entity } => write!(f, "{entity} stops"),
            Self::Selected { entity } => write!(f, "tapped {entity}"),
            Self::Sound { asset, volume } => write!(f, "sound '{asset}' at volume {volume}"),
            Self::SoundFailed { asset, reason } => write!(f, "sound '{asset}' failed: {reason}"),
            Self::MissingNode { name } => write!(f, "missing node '{name}'"),
            Self::StaleDiscarded { generation } => {
                write!(f, "discarded continuation from generation {generation}")
            }
        }
    }
}

/// A record of something that happened on stage.
#[derive(Debug, Clone)]
pub struct StageEvent {
    /// Virtual time of the event.
    pub at_ms: u64,
    /// Scene generation current when it was recorded.
    pub generation: u64,
    /// The specific kind of event.
    pub kind: StageEventKind,
}

/// Accumulates events during a run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<StageEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest ones past capacity.
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let excess = self.events.len() - self.max_events;
            self.events.drain(..excess);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Events recorded while `generation` was current.
    pub fn for_generation(&self, generation: u64) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.generation == generation)
            .collect()
    }

    /// Events whose kind matches `predicate`.
    pub fn matching<F>(&self, predicate: F) -> Vec<&StageEvent>
    where
        F: Fn(&StageEventKind) -> bool,
    {
        self.events.iter().filter(|e| predicate(&e.kind)).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
