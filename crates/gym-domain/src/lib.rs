// gym-domain library entry point
pub mod catalog;
pub mod error;
pub mod ids;
pub mod workout;
pub use catalog::{Client, Exercise, ExerciseOption, Instructor, InstructorClientCount, Payment, PaymentStats, Plan,
                  WorkoutExerciseRow, WorkoutOverview};
pub use error::DomainError;
pub use ids::{ClientId, ExerciseId, InstructorId, LinkId, PaymentId, PlanId, WorkoutId};
pub use workout::{ExerciseEntryDraft, StagedExerciseEntry, WorkoutDraft, WorkoutHeader};
