use crate::plan::{Exercise, Phase};
use chrono::NaiveDate;
use std::sync::OnceLock;

static CATALOG: OnceLock<Vec<Phase>> = OnceLock::new();

/// The built-in training program, in program order.
pub fn catalog() -> &'static [Phase] {
    CATALOG.get_or_init(build_catalog)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn exercise(
    id: &str,
    name: &str,
    duration_secs: u32,
    target: &str,
    description: &str,
    voice_cues: &[&str],
    video_url: &str,
) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        duration_secs,
        target: target.to_string(),
        description: description.to_string(),
        voice_cues: voice_cues.iter().map(|cue| cue.to_string()).collect(),
        video_url: video_url.to_string(),
    }
}

fn build_catalog() -> Vec<Phase> {
    vec![
        Phase {
            id: 1,
            name: "Phase 1: Basics & Fundament".to_string(),
            start_date: date(2026, 1, 5),
            end_date: date(2026, 4, 6),
            description: "Fokus auf Körperspannung und Gelenkvorbereitung.".to_string(),
            exercises: vec![
                exercise(
                    "p1_hollow_hang",
                    "1. Hollow Body Hangs",
                    60,
                    "Max. Zeit halten",
                    "An Stange hängen, Schultern aktiv runterziehen, Bauch fest. Wie eine Banane.",
                    &[
                        "Schultern weg von den Ohren",
                        "Bauch fest anspannen",
                        "Beine zusammenpressen",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=5",
                ),
                exercise(
                    "p1_frog_stand",
                    "2. Frog Stand",
                    20,
                    "Ziel: 20 Sek.",
                    "Hände zum Boden, Knie auf Ellbogen ablegen, Gewicht vorlagern.",
                    &[
                        "Gewicht nach vorne verlagern",
                        "Balance halten",
                        "Blick leicht nach vorne",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=46",
                ),
                exercise(
                    "p1_hollow_hold",
                    "3. Hollow Body Holds",
                    45,
                    "Ziel: 45 Sek.",
                    "Rückenlage, unteren Rücken fest in Boden pressen, Arme/Beine schweben.",
                    &[
                        "Unterer Rücken bleibt am Boden",
                        "Atmen nicht vergessen",
                        "Spannung halten",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=126",
                ),
                exercise(
                    "p1_planche_lean",
                    "4. Pseudo Planche Lean",
                    60,
                    "Max. Zeit",
                    "Liegestütz-Position, Arme gestreckt, weit nach vorne lehnen.",
                    &[
                        "Arme komplett gestreckt lassen",
                        "Lehn dich weiter vor",
                        "Po nicht zu hoch",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=168",
                ),
            ],
        },
        Phase {
            id: 2,
            name: "Phase 2: Kraft & Statik".to_string(),
            start_date: date(2026, 4, 6),
            end_date: date(2026, 7, 6),
            description: "Aufbau von Grundkraft mit komplexeren Hebeln.".to_string(),
            exercises: vec![
                exercise(
                    "p2_pppu",
                    "1. Pseudo Planche Push-up",
                    60,
                    "8-12 Wh.",
                    "Weit nach vorne lehnen, dann Liegestütz (Ellbogen eng).",
                    &[
                        "Ellbogen eng am Körper",
                        "Vorne bleiben beim Drücken",
                        "Volle Bewegung",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=219",
                ),
                exercise(
                    "p2_tuck_fl",
                    "2. Tuck Front Lever",
                    30,
                    "Max. Zeit",
                    "An Stange hängen, Knie zur Brust, waagerecht nach hinten lehnen.",
                    &[
                        "Arme gestreckt lassen",
                        "Rücken gerade machen",
                        "Knie zur Brust ziehen",
                    ],
                    "https://youtu.be/J2JHDavNZB4?t=250",
                ),
                exercise(
                    "p2_pistol",
                    "5. Pistol Squat",
                    60,
                    "5-8 Wh. pro Bein",
                    "Einbeinige Kniebeuge.",
                    &["Ferse bleibt am Boden", "Knie stabil halten"],
                    "https://youtu.be/J2JHDavNZB4?t=387",
                ),
            ],
        },
    ]
}
