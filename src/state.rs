use std::sync::Arc;

use crate::database::Store;
use crate::services::{
    DisciplineService, GradeService, GroupDisciplineService, GroupService, StudentService, TeacherService,
    UserService,
};

/// Shared handler state: the store and one service per resource.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: UserService,
    pub teachers: TeacherService,
    pub students: StudentService,
    pub groups: GroupService,
    pub disciplines: DisciplineService,
    pub grades: GradeService,
    pub group_disciplines: GroupDisciplineService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            teachers: TeacherService::new(store.clone()),
            students: StudentService::new(store.clone()),
            groups: GroupService::new(store.clone()),
            disciplines: DisciplineService::new(store.clone()),
            grades: GradeService::new(store.clone()),
            group_disciplines: GroupDisciplineService::new(store.clone()),
            store,
        }
    }
}
