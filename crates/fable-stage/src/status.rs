/// The on-screen scene readout: title plus what the viewer should do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBoard {
    /// Scene title.
    pub title: String,
    /// Viewer instructions.
    pub instructions: String,
    /// Hidden until the first scene loads.
    pub visible: bool,
}

impl StatusBoard {
    /// Replace the text and reveal the board.
    pub fn show(&mut self, title: &str, instructions: &str) {
        self.title = title.to_string();
        self.instructions = instructions.to_string();
        self.visible = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_until_shown() {
        let mut board = StatusBoard::default();
        assert!(!board.visible);
        board.show("Scene 1", "Tap Talk");
        assert!(board.visible);
        assert_eq!(board.title, "Scene 1");
        assert_eq!(board.instructions, "Tap Talk");
    }
}
