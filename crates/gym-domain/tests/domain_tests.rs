use chrono::NaiveDate;
use gym_domain::{DomainError, ExerciseEntryDraft, StagedExerciseEntry, WorkoutDraft, WorkoutHeader};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_header_full_draft_roundtrip() {
    let draft = WorkoutDraft { name: "Upper A".to_string(),
                               start_date: Some(date(2024, 1, 1)),
                               end_date: Some(date(2024, 3, 1)),
                               description: Some("bloque de fuerza".to_string()),
                               kind: Some("fuerza".to_string()),
                               objective: Some("progresión 5x5".to_string()),
                               client_id: Some(3),
                               instructor_id: Some(1),
                               plan_id: None };
    let header = WorkoutHeader::from_draft(draft).unwrap();
    assert_eq!(header.name(), "Upper A");
    assert_eq!(header.start_date(), date(2024, 1, 1));
    assert_eq!(header.end_date(), Some(date(2024, 3, 1)));
    assert_eq!(header.kind(), Some("fuerza"));
    assert_eq!(header.client_id(), Some(3));
    assert_eq!(header.plan_id(), None);
}

#[test]
fn test_header_blank_name_is_validation_error() {
    let draft = WorkoutDraft { name: "  ".to_string(),
                               start_date: Some(date(2024, 1, 1)),
                               ..Default::default() };
    match WorkoutHeader::from_draft(draft) {
        Err(DomainError::ValidationError(msg)) => assert!(msg.contains("nombre")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_entry_blank_sets_rejected() {
    let draft = ExerciseEntryDraft { exercise: Some(4),
                                     sets: "".to_string(),
                                     reps: "12".to_string(),
                                     ..Default::default() };
    assert!(StagedExerciseEntry::from_draft(draft, 1).is_err());
}

#[test]
fn test_entry_blank_reps_rejected() {
    let draft = ExerciseEntryDraft { exercise: Some(4),
                                     sets: "3".to_string(),
                                     reps: "   ".to_string(),
                                     ..Default::default() };
    assert!(StagedExerciseEntry::from_draft(draft, 1).is_err());
}

#[test]
fn test_entry_keeps_optional_fields() {
    let draft = ExerciseEntryDraft { exercise: Some(4),
                                     order: Some(2),
                                     sets: "4".to_string(),
                                     reps: "8".to_string(),
                                     load: Some("60kg".to_string()),
                                     rest_seconds: Some(90),
                                     notes: Some("tempo 3-1-1".to_string()) };
    let entry = StagedExerciseEntry::from_draft(draft, 1).unwrap();
    assert_eq!(entry.order(), 2);
    assert_eq!(entry.load(), Some("60kg"));
    assert_eq!(entry.rest_seconds(), Some(90));
    assert_eq!(entry.notes(), Some("tempo 3-1-1"));
}
