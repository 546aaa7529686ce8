//! Classes and their student/teacher membership.

use crate::core::error::{ServiceError, required};
use crate::core::services::membership::{ensure_link, links_of, remove_link};
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Class, ClassPatch, ClassTeacher, NewClass, StudentOfClass};
use crate::infrastructure::repositories::{Filter, Repository};
use di::{Ref, inject, injectable};

pub struct ClassesService {
    classes: Repository<Class>,
    students_of_class: Option<Repository<StudentOfClass>>,
    class_teacher: Option<Repository<ClassTeacher>>,
}

#[injectable]
impl ClassesService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> ClassesService {
        let classes = Repository::<Class>::new(connection.pool().clone());
        ClassesService {
            students_of_class: Some(classes.sibling()),
            class_teacher: Some(classes.sibling()),
            classes,
        }
    }
}

impl ClassesService {
    pub fn new(
        classes: Repository<Class>,
        students_of_class: Option<Repository<StudentOfClass>>,
        class_teacher: Option<Repository<ClassTeacher>>,
    ) -> ClassesService {
        ClassesService {
            classes,
            students_of_class,
            class_teacher,
        }
    }

    pub async fn create_class(&self, new: NewClass) -> Result<Class, ServiceError> {
        Ok(self.classes.create(new).await?)
    }

    pub async fn get_class(&self, class_id: i64) -> Result<Option<Class>, ServiceError> {
        Ok(self.classes.get(class_id).await?)
    }

    pub async fn list_classes(&self, filter: Filter) -> Result<Vec<Class>, ServiceError> {
        Ok(self.classes.list(filter).await?)
    }

    pub async fn update_class(
        &self,
        class_id: i64,
        patch: ClassPatch,
    ) -> Result<Option<Class>, ServiceError> {
        Ok(self.classes.update(class_id, patch).await?)
    }

    pub async fn delete_class(&self, class_id: i64) -> Result<Option<Class>, ServiceError> {
        Ok(self.classes.delete(class_id).await?)
    }

    pub async fn restore_class(&self, class_id: i64) -> Result<Option<Class>, ServiceError> {
        Ok(self.classes.restore(class_id).await?)
    }

    /// Enrols a user. Calling it again for the same pair returns the same link.
    pub async fn add_student(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<StudentOfClass, ServiceError> {
        let students = required(&self.students_of_class, "students_of_class")?;
        Ok(ensure_link(students, class_id, user_id).await?)
    }

    pub async fn remove_student(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<StudentOfClass>, ServiceError> {
        let students = required(&self.students_of_class, "students_of_class")?;
        Ok(remove_link(students, class_id, user_id).await?)
    }

    pub async fn list_students(&self, class_id: i64) -> Result<Vec<StudentOfClass>, ServiceError> {
        let students = required(&self.students_of_class, "students_of_class")?;
        Ok(links_of(students, class_id).await?)
    }

    pub async fn add_teacher(
        &self,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<ClassTeacher, ServiceError> {
        let teachers = required(&self.class_teacher, "class_teacher")?;
        Ok(ensure_link(teachers, class_id, teacher_id).await?)
    }

    pub async fn remove_teacher(
        &self,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<Option<ClassTeacher>, ServiceError> {
        let teachers = required(&self.class_teacher, "class_teacher")?;
        Ok(remove_link(teachers, class_id, teacher_id).await?)
    }

    pub async fn list_teachers(&self, class_id: i64) -> Result<Vec<ClassTeacher>, ServiceError> {
        let teachers = required(&self.class_teacher, "class_teacher")?;
        Ok(links_of(teachers, class_id).await?)
    }
}
