//! Free-text command interpretation.
//!
//! Transcripts are matched against an ordered table of
//! `(predicate, command)` rows. Predicates are plain substring tests — a
//! conjunction of keyword alternatives, not NLP — and every matching row
//! fires, so a single utterance can both fabricate a helmet and open its
//! faceplate. Unrecognized transcripts are silently ignored.

use crate::assembly::AssemblyKind;
use crate::config::MechanismPolicy;

/// A discrete engine operation decoded from a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fabricate an assembly, replacing the active one.
    Spawn(AssemblyKind),
    /// Swing the hinged mechanism open.
    OpenMechanism,
    /// Swing the hinged mechanism shut.
    CloseMechanism,
    /// Ease the camera toward the named part.
    Focus(&'static str),
    /// Ease the camera back to its default pose.
    ResetView,
    /// Start the mock stress diagnostic.
    RunDiagnostics,
    /// Remove the active assembly.
    Clear,
}

/// A conjunction of keyword alternatives.
///
/// The transcript matches when every group contributes at least one
/// matching substring: `[["focus"], ["core"]]` reads "focus AND core".
#[derive(Debug, Clone, Copy)]
struct Predicate(&'static [&'static [&'static str]]);

impl Predicate {
    fn matches(&self, transcript: &str) -> bool {
        self.0
            .iter()
            .all(|alternatives| alternatives.iter().any(|k| transcript.contains(k)))
    }
}

/// Keywords that request a helmet build.
const HELMET_KEYWORDS: &[&str] = &["helmet", "mask", "suit"];

/// Words that identify the hinged mechanism as the subject of a verb.
const MECHANISM_SUBJECTS: &[&str] = &["helmet", "mask", "suit", "face"];

/// The ordered command table for one session.
#[derive(Debug)]
pub struct CommandTable {
    rows: Vec<(Predicate, Command)>,
}

impl CommandTable {
    /// Build the table for the given mechanism verb policy.
    pub fn new(policy: MechanismPolicy) -> Self {
        let mut rows: Vec<(Predicate, Command)> = vec![
            (
                Predicate(&[&["time", "band"]]),
                Command::Spawn(AssemblyKind::TimeBand),
            ),
            (
                Predicate(&[HELMET_KEYWORDS]),
                Command::Spawn(AssemblyKind::Helmet),
            ),
        ];

        match policy {
            MechanismPolicy::SubjectRequired => {
                rows.push((
                    Predicate(&[&["open"], MECHANISM_SUBJECTS]),
                    Command::OpenMechanism,
                ));
                rows.push((
                    Predicate(&[&["close"], MECHANISM_SUBJECTS]),
                    Command::CloseMechanism,
                ));
            }
            MechanismPolicy::BareVerb => {
                rows.push((Predicate(&[&["open"]]), Command::OpenMechanism));
                rows.push((Predicate(&[&["close"]]), Command::CloseMechanism));
            }
        }

        rows.extend([
            (
                Predicate(&[&["focus"], &["core"]]),
                Command::Focus(crate::assembly::PART_CORE),
            ),
            (
                Predicate(&[&["focus"], &["lens"]]),
                Command::Focus(crate::assembly::PART_LENS),
            ),
            (
                Predicate(&[&["focus"], &["face"]]),
                Command::Focus(crate::assembly::PART_FACEPLATE),
            ),
            (Predicate(&[&["reset", "zoom out"]]), Command::ResetView),
            (
                Predicate(&[&["test", "diagnostic", "safety"]]),
                Command::RunDiagnostics,
            ),
            (Predicate(&[&["clear"]]), Command::Clear),
        ]);

        Self { rows }
    }

    /// Decode a transcript into the commands it triggers, in table order.
    ///
    /// Matching is case-insensitive; an empty result means the transcript
    /// was not recognized.
    pub fn interpret(&self, transcript: &str) -> Vec<Command> {
        let transcript = transcript.to_lowercase();
        self.rows
            .iter()
            .filter(|(predicate, _)| predicate.matches(&transcript))
            .map(|&(_, command)| command)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> CommandTable {
        CommandTable::new(MechanismPolicy::SubjectRequired)
    }

    #[test]
    fn spawn_keywords() {
        assert_eq!(
            strict().interpret("fabricate the time band"),
            vec![Command::Spawn(AssemblyKind::TimeBand)]
        );
        assert_eq!(
            strict().interpret("build me a MASK"),
            vec![Command::Spawn(AssemblyKind::Helmet)]
        );
    }

    #[test]
    fn subject_required_needs_co_occurrence() {
        let table = strict();
        // "helmet" also matches the spawn row; both actions fire.
        assert_eq!(
            table.interpret("please open the helmet now"),
            vec![Command::Spawn(AssemblyKind::Helmet), Command::OpenMechanism]
        );
        // Bare verb without a mechanism subject is not recognized.
        assert_eq!(table.interpret("open the window"), Vec::<Command>::new());
    }

    #[test]
    fn bare_verb_policy_accepts_verb_alone() {
        let table = CommandTable::new(MechanismPolicy::BareVerb);
        assert_eq!(table.interpret("open the window"), vec![Command::OpenMechanism]);
        assert_eq!(table.interpret("close it"), vec![Command::CloseMechanism]);
    }

    #[test]
    fn focus_needs_part_keyword() {
        assert_eq!(
            strict().interpret("focus on the core"),
            vec![Command::Focus("core")]
        );
        assert_eq!(
            strict().interpret("focus on the faceplate"),
            vec![Command::Focus("faceplate")]
        );
        assert_eq!(strict().interpret("focus please"), Vec::<Command>::new());
    }

    #[test]
    fn diagnostics_and_view_keywords() {
        assert_eq!(
            strict().interpret("run a safety check"),
            vec![Command::RunDiagnostics]
        );
        assert_eq!(strict().interpret("zoom out a bit"), vec![Command::ResetView]);
        assert_eq!(strict().interpret("clear the workspace"), vec![Command::Clear]);
    }

    #[test]
    fn unrecognized_is_empty() {
        assert!(strict().interpret("what's for lunch").is_empty());
        assert!(strict().interpret("").is_empty());
    }

    #[test]
    fn multiple_groups_fire_together() {
        let commands = strict().interpret("clear everything and run the diagnostic");
        assert_eq!(commands, vec![Command::RunDiagnostics, Command::Clear]);
    }
}
