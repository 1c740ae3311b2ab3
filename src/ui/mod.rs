use crate::coach::View;

pub mod help;
pub mod home;
pub mod log;
pub mod settings;
pub mod start;
pub mod top_bar;

/// What a view asks the app to do. Views only read controller state and
/// emit these; `CoachApp` applies them after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    StartSession,
    RequestNext,
    SelectExercise(usize),
    ToggleTimer,
    FinishExercise,
    ShowView(View),
    ToggleListening,
    ToggleHelp,
    OpenVideo(String),
    SaveApiKey,
    ClearApiKey,
    SubmitUtterance(String),
}
