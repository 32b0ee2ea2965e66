use crate::tui::Action;

/// Which input field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    User,
    #[default]
    Message,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::User => Self::Message,
            Self::Message => Self::User,
        }
    }
}

pub trait AppController {
    fn update(&mut self, action: Action);
    fn render(&mut self, f: &mut ratatui::Frame);
    fn should_quit(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_toggles_back_and_forth() {
        assert_eq!(Focus::default(), Focus::Message);
        assert_eq!(Focus::Message.toggle(), Focus::User);
        assert_eq!(Focus::User.toggle(), Focus::Message);
    }
}
