#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Start,
    Pause,
    Finish,
    Next,
    ShowLog,
    ShowHome,
}

// Priority order: the first vocabulary with a substring hit wins.
const VOCABULARY: &[(VoiceCommand, &[&str])] = &[
    (VoiceCommand::Start, &["start", "los"]),
    (VoiceCommand::Pause, &["stop", "pause", "warte"]),
    (VoiceCommand::Finish, &["fertig"]),
    (VoiceCommand::Next, &["weiter", "nächste"]),
    (VoiceCommand::ShowLog, &["log", "verlauf"]),
    (VoiceCommand::ShowHome, &["zurück", "home"]),
];

pub fn parse_command(utterance: &str) -> Option<VoiceCommand> {
    let lowered = utterance.to_lowercase();
    VOCABULARY
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lowered.contains(phrase)))
        .map(|(command, _)| *command)
}

/// Phrases shown in the voice command cheat sheet.
pub fn cheat_sheet() -> &'static [(&'static str, &'static str)] {
    &[
        ("\"Start\" / \"Los\"", "Timer starten"),
        ("\"Stopp\" / \"Pause\"", "Timer anhalten"),
        ("\"Weiter\" / \"Fertig\"", "Übung abschließen"),
        ("\"Verlauf\" / \"Zurück\"", "Ansicht wechseln"),
    ]
}
