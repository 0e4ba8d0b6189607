use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 选课表（学生与课程的唯一成员关系）
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 支付申请表
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Payments::TransactionId).string().null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("requested"),
                    )
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(ColumnDef::new(Payments::ApprovedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::ApprovedAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::ApprovedBy)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 视频观看进度表
        manager
            .create_table(
                Table::create()
                    .table(VideoProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoProgress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::VideoId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::ProgressPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::TimeSpentSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::LastWatched)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoProgress::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoProgress::Table, VideoProgress::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoProgress::Table, VideoProgress::VideoId)
                            .to(CourseVideos::Table, CourseVideos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教练评分表
        manager
            .create_table(
                Table::create()
                    .table(TrainerRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainerRatings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrainerRatings::TrainerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainerRatings::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrainerRatings::Rating).integer().not_null())
                    .col(ColumnDef::new(TrainerRatings::Comment).text().null())
                    .col(
                        ColumnDef::new(TrainerRatings::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainerRatings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrainerRatings::Table, TrainerRatings::TrainerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrainerRatings::Table, TrainerRatings::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 视频评分表
        manager
            .create_table(
                Table::create()
                    .table(VideoRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoRatings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VideoRatings::VideoId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoRatings::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VideoRatings::Rating).integer().not_null())
                    .col(ColumnDef::new(VideoRatings::Comment).text().null())
                    .col(
                        ColumnDef::new(VideoRatings::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoRatings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoRatings::Table, VideoRatings::VideoId)
                            .to(CourseVideos::Table, CourseVideos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VideoRatings::Table, VideoRatings::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程反馈表
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedbacks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedbacks::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Feedbacks::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Feedbacks::Rating).integer().not_null())
                    .col(ColumnDef::new(Feedbacks::Comment).text().not_null())
                    .col(ColumnDef::new(Feedbacks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Feedbacks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedbacks::Table, Feedbacks::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_enrollments_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_video_progress_student_video")
                    .table(VideoProgress::Table)
                    .col(VideoProgress::StudentId)
                    .col(VideoProgress::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_trainer_ratings_trainer_student")
                    .table(TrainerRatings::Table)
                    .col(TrainerRatings::TrainerId)
                    .col(TrainerRatings::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_video_ratings_video_student")
                    .table(VideoRatings::Table)
                    .col(VideoRatings::VideoId)
                    .col(VideoRatings::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_feedbacks_student_course")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::StudentId)
                    .col(Feedbacks::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 普通索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_student_course_status")
                    .table(Payments::Table)
                    .col(Payments::StudentId)
                    .col(Payments::CourseId)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoRatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainerRatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideoProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CourseVideos {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    CourseId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    StudentId,
    CourseId,
    Amount,
    PaymentMethod,
    TransactionId,
    Status,
    Notes,
    ApprovedBy,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VideoProgress {
    Table,
    Id,
    StudentId,
    VideoId,
    ProgressPercentage,
    Completed,
    TimeSpentSeconds,
    LastWatched,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TrainerRatings {
    Table,
    Id,
    TrainerId,
    StudentId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VideoRatings {
    Table,
    Id,
    VideoId,
    StudentId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    StudentId,
    CourseId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}
