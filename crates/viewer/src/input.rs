//! UI events and key mapping

/// Clickable viewer controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Button {
    First,
    Previous,
    Next,
    Last,
    ZoomIn,
    ZoomOut,
    Fullscreen,
    ToggleThumbnails,
    CloseThumbnails,
}

/// A key press, by browser key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Escape,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    /// Browser key name
    pub fn name(&self) -> &str {
        match self {
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::Home => "Home",
            Key::End => "End",
            Key::Escape => "Escape",
            Key::Other(name) => name.as_str(),
        }
    }
}

/// Events delivered to the viewer by its host
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click(Button),
    /// Raw value of the page slider
    SliderInput(String),
    ThumbnailClick(u32),
    KeyDown(Key),
}

/// What the host should do with the originating browser event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn handled() -> Self {
        Self::default()
    }

    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
        }
    }
}

/// Parse a slider value the way a browser range input reports it.
pub fn parse_slider(value: &str) -> Option<u32> {
    let value = value.trim();
    value.parse::<u32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u32)
    })
}
