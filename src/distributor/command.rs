//! Interactive commands delivered as key presses.

/// A recognised key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `p`: pause, or advance one turn when already paused.
    Pause,
    /// `s`: write the current grid.
    Save,
    /// `q`: write the current grid and stop.
    Quit,
}

impl Command {
    /// Map a key to a command. Unrecognised keys yield `None`.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'p' => Some(Command::Pause),
            's' => Some(Command::Save),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(Command::from_key('p'), Some(Command::Pause));
        assert_eq!(Command::from_key('s'), Some(Command::Save));
        assert_eq!(Command::from_key('q'), Some(Command::Quit));
        assert_eq!(Command::from_key('k'), None);
        assert_eq!(Command::from_key('P'), None);
    }
}
