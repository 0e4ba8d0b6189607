use super::{SeaOrmStorage, db_err};
use crate::entity::trainer_course_assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::{courses, enrollments};
use crate::errors::{LmsError, Result};
use crate::models::catalog::entities::TrainerAssignment;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 分配教练，已存在相同分配时返回 None
    pub async fn assign_trainer_impl(
        &self,
        trainer_id: i64,
        course_id: i64,
        assigned_by: Option<i64>,
    ) -> Result<Option<TrainerAssignment>> {
        if self.is_trainer_assigned_impl(trainer_id, course_id).await? {
            return Ok(None);
        }

        let model = ActiveModel {
            trainer_id: Set(trainer_id),
            course_id: Set(course_id),
            assigned_by: Set(assigned_by),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await.map_err(db_err("分配教练失败")) {
            Ok(created) => Ok(Some(created.into_assignment())),
            // 并发分配时由唯一索引兜底
            Err(LmsError::Conflict(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_assignment_impl(&self, assignment_id: i64) -> Result<Option<TrainerAssignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(db_err("查询教练分配失败"))?;
        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(db_err("取消教练分配失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_trainer_assigned_impl(&self, trainer_id: i64, course_id: i64) -> Result<bool> {
        let count = Assignments::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(db_err("查询教练分配失败"))?;
        Ok(count > 0)
    }

    pub async fn list_assignments_impl(&self) -> Result<Vec<TrainerAssignment>> {
        let result = Assignments::find()
            .order_by_desc(Column::AssignedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询教练分配失败"))?;
        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn list_trainer_assignments_impl(
        &self,
        trainer_id: i64,
    ) -> Result<Vec<TrainerAssignment>> {
        let result = Assignments::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .order_by_desc(Column::AssignedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询教练分配失败"))?;
        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn list_course_trainer_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        let result = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::AssignedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程教练失败"))?;
        Ok(result.into_iter().map(|m| m.trainer_id).collect())
    }

    /// 教练是否为学生已选课程的讲师或分配教练
    pub async fn trainer_reachable_by_student_impl(
        &self,
        trainer_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        let mut course_ids: Vec<i64> = Assignments::find()
            .filter(Column::TrainerId.eq(trainer_id))
            .all(&self.db)
            .await
            .map_err(db_err("查询教练分配失败"))?
            .into_iter()
            .map(|m| m.course_id)
            .collect();
        course_ids.extend(
            courses::Entity::find()
                .filter(courses::Column::InstructorId.eq(trainer_id))
                .all(&self.db)
                .await
                .map_err(db_err("查询讲师课程失败"))?
                .into_iter()
                .map(|c| c.id),
        );
        if course_ids.is_empty() {
            return Ok(false);
        }

        let count = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.is_in(course_ids))
            .count(&self.db)
            .await
            .map_err(db_err("查询选课记录失败"))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::courses::tests::{course_input, create_member};
    use super::*;
    use crate::models::accounts::entities::Role;
    use crate::models::learning::payments::{
        NewPayment, PaymentAction, PaymentDecision, PaymentMethod,
    };
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_assign_is_idempotent() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let manager = create_member(&storage, "manager1", Role::Manager).await;
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let course = storage
            .create_course(course_input("Assigned", manager))
            .await
            .expect("course");

        let first = storage
            .assign_trainer(trainer, course.id, Some(manager))
            .await
            .expect("assign");
        assert!(first.is_some());
        let second = storage
            .assign_trainer(trainer, course.id, Some(manager))
            .await
            .expect("assign again");
        assert!(second.is_none());

        assert_eq!(
            storage.list_course_trainer_ids(course.id).await.expect("ids"),
            vec![trainer]
        );
        let assignment = first.expect("first");
        assert!(storage.delete_assignment(assignment.id).await.expect("delete"));
        assert!(!storage.is_trainer_assigned(trainer, course.id).await.expect("check"));
    }

    #[tokio::test]
    async fn test_trainer_reachability_follows_enrollment() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let manager = create_member(&storage, "manager1", Role::Manager).await;
        let trainer = create_member(&storage, "trainer1", Role::Trainer).await;
        let student = create_member(&storage, "student1", Role::Student).await;
        let course = storage
            .create_course(course_input("Reachable", manager))
            .await
            .expect("course");
        storage
            .assign_trainer(trainer, course.id, Some(manager))
            .await
            .expect("assign");

        assert!(
            !storage
                .trainer_reachable_by_student(trainer, student)
                .await
                .expect("before enrollment")
        );

        let payment = storage
            .create_payment(NewPayment {
                student_id: student,
                course_id: course.id,
                amount: course.price,
                payment_method: PaymentMethod::Upi,
                transaction_id: None,
                notes: None,
            })
            .await
            .expect("payment");
        let decision = storage
            .decide_payment(payment.id, manager, PaymentAction::Approve, None)
            .await
            .expect("approve");
        assert!(matches!(decision, PaymentDecision::Approved { .. }));

        assert!(
            storage
                .trainer_reachable_by_student(trainer, student)
                .await
                .expect("after enrollment")
        );
        // 课程讲师同样可达
        assert!(
            storage
                .trainer_reachable_by_student(manager, student)
                .await
                .expect("instructor")
        );
    }
}
