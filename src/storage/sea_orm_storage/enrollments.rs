use std::collections::HashSet;

use super::{SeaOrmStorage, db_err};
use crate::entity::enrollments::{Column, Entity as Enrollments};
use crate::errors::Result;
use crate::models::learning::enrollments::Enrollment;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    pub async fn is_enrolled_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(db_err("查询选课记录失败"))?;
        Ok(count > 0)
    }

    pub async fn list_student_enrollments_impl(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生选课失败"))?;
        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn list_course_enrollments_impl(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程学生失败"))?;
        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn list_latest_enrollments_impl(&self, limit: u64) -> Result<Vec<Enrollment>> {
        let result = Enrollments::find()
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err("查询最新选课失败"))?;
        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    pub async fn count_enrollments_impl(&self) -> Result<u64> {
        Enrollments::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计选课记录失败"))
    }

    pub async fn count_course_students_impl(&self, course_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计课程学生失败"))
    }

    pub async fn count_distinct_students_impl(&self, course_ids: &[i64]) -> Result<u64> {
        if course_ids.is_empty() {
            return Ok(0);
        }
        let students: HashSet<i64> = Enrollments::find()
            .filter(Column::CourseId.is_in(course_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err("统计学生数失败"))?
            .into_iter()
            .map(|m| m.student_id)
            .collect();
        Ok(students.len() as u64)
    }
}
