use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Category).string().not_null())
                    .col(ColumnDef::new(Courses::Level).string().not_null())
                    .col(ColumnDef::new(Courses::Duration).string().not_null())
                    .col(ColumnDef::new(Courses::Requirements).text().not_null())
                    .col(ColumnDef::new(Courses::Content).text().not_null())
                    .col(
                        ColumnDef::new(Courses::ListPrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Courses::Discount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Courses::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Courses::Thumbnail).string().null())
                    .col(ColumnDef::new(Courses::FeaturedVideo).string().null())
                    .col(
                        ColumnDef::new(Courses::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程视频表
        manager
            .create_table(
                Table::create()
                    .table(CourseVideos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseVideos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseVideos::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseVideos::Title).string().not_null())
                    .col(ColumnDef::new(CourseVideos::Video).string().null())
                    .col(
                        ColumnDef::new(CourseVideos::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CourseVideos::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseVideos::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseVideos::Table, CourseVideos::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教练-课程分配表
        manager
            .create_table(
                Table::create()
                    .table(TrainerCourseAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainerCourseAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrainerCourseAssignments::TrainerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainerCourseAssignments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainerCourseAssignments::AssignedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TrainerCourseAssignments::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TrainerCourseAssignments::Table,
                                TrainerCourseAssignments::TrainerId,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TrainerCourseAssignments::Table,
                                TrainerCourseAssignments::CourseId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TrainerCourseAssignments::Table,
                                TrainerCourseAssignments::AssignedBy,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 教练联系方式表
        manager
            .create_table(
                Table::create()
                    .table(TrainerContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainerContacts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrainerContacts::TrainerId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TrainerContacts::Whatsapp).string().null())
                    .col(
                        ColumnDef::new(TrainerContacts::MicrosoftTeams)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(TrainerContacts::Skype).string().null())
                    .col(ColumnDef::new(TrainerContacts::Email).string().null())
                    .col(ColumnDef::new(TrainerContacts::Phone).string().null())
                    .col(
                        ColumnDef::new(TrainerContacts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrainerContacts::Table, TrainerContacts::TrainerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_instructor_id")
                    .table(Courses::Table)
                    .col(Courses::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_category")
                    .table(Courses::Table)
                    .col(Courses::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_videos_course_id")
                    .table(CourseVideos::Table)
                    .col(CourseVideos::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_assignments_trainer_course")
                    .table(TrainerCourseAssignments::Table)
                    .col(TrainerCourseAssignments::TrainerId)
                    .col(TrainerCourseAssignments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrainerContacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainerCourseAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseVideos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
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
    Title,
    Slug,
    Description,
    Category,
    Level,
    Duration,
    Requirements,
    Content,
    ListPrice,
    Discount,
    Price,
    Thumbnail,
    FeaturedVideo,
    InstructorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseVideos {
    Table,
    Id,
    CourseId,
    Title,
    Video,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TrainerCourseAssignments {
    Table,
    Id,
    TrainerId,
    CourseId,
    AssignedBy,
    AssignedAt,
}

#[derive(DeriveIden)]
enum TrainerContacts {
    Table,
    Id,
    TrainerId,
    Whatsapp,
    MicrosoftTeams,
    Skype,
    Email,
    Phone,
    UpdatedAt,
}
