pub mod discipline;
pub mod grade;
pub mod group;
pub mod group_discipline;
pub mod student;
pub mod teacher;
pub mod user;

pub use discipline::{Discipline, DisciplineChanges, NewDiscipline};
pub use grade::{Grade, GradeChanges, NewGrade};
pub use group::{Group, GroupChanges};
pub use group_discipline::GroupDiscipline;
pub use student::{NewStudent, Student, StudentChanges};
pub use teacher::{NewTeacher, Teacher, TeacherChanges};
pub use user::{NewUser, User, UserChanges};
