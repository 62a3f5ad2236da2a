use roadstream_kernel::Lane;

/// A key press, independent of the windowing library that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Character(char),
    Other,
}

impl Key {
    /// Key for the text a key press produced. Case is kept, so `D` and `d`
    /// are different keys.
    pub fn from_text(text: &str) -> Self {
        text.chars().next().map_or(Self::Other, Self::Character)
    }
}

/// A high-level action the frame driver applies between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Steer toward the centre of a lane.
    SelectLane(Lane),
}

impl Action {
    /// Map a key to its action. ArrowRight or `d` selects lane 0 (left of
    /// the road), ArrowLeft or `a` selects lane 1.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowRight | Key::Character('d') => Some(Self::SelectLane(Lane::Left)),
            Key::ArrowLeft | Key::Character('a') => Some(Self::SelectLane(Lane::Right)),
            Key::Character(_) | Key::Other => None,
        }
    }
}
