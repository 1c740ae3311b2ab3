use crate::plan::Phase;
use crate::session::LogEntry;

/// Index of the exercise to do next. `logs` are newest-first.
///
/// Advances past the newest entry when it belongs to `phase` and was not the
/// phase's last exercise; every other case restarts the cycle at 0.
pub fn next_exercise_index(logs: &[LogEntry], phase: &Phase) -> usize {
    let Some(latest) = logs.first() else {
        return 0;
    };
    if latest.phase_id != phase.id {
        return 0;
    }

    match phase.exercise_index(&latest.exercise_name) {
        Some(index) if index + 1 < phase.exercises.len() => index + 1,
        _ => 0,
    }
}
