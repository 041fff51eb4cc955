use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::ProjectNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // LATEST / LATEST_LOCKED / LATEST_RELEASED pointers are plain columns: the
        // value table references the root, so a foreign key here would be circular.
        manager
            .create_table(
                Table::create()
                    .table(StudyRoots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyRoots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudyRoots::Uid).string().not_null().unique_key())
                    .col(ColumnDef::new(StudyRoots::WriteLock).string())
                    .col(
                        ColumnDef::new(StudyRoots::WriteLockGeneration)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StudyRoots::LatestValueId).integer())
                    .col(ColumnDef::new(StudyRoots::LatestLockedValueId).integer())
                    .col(ColumnDef::new(StudyRoots::LatestReleasedValueId).integer())
                    .col(ColumnDef::new(StudyRoots::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudyValues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyValues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudyValues::StudyRootId).integer().not_null())
                    .col(ColumnDef::new(StudyValues::ProjectId).integer())
                    .col(ColumnDef::new(StudyValues::StudyNumber).string())
                    .col(ColumnDef::new(StudyValues::StudyAcronym).string())
                    .col(ColumnDef::new(StudyValues::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_values_study_root_id")
                            .from(StudyValues::Table, StudyValues::StudyRootId)
                            .to(StudyRoots::Table, StudyRoots::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_values_project_id")
                            .from(StudyValues::Table, StudyValues::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudyValueVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyValueVersions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudyValueVersions::StudyRootId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyValueVersions::StudyValueId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudyValueVersions::Status).string().not_null())
                    .col(ColumnDef::new(StudyValueVersions::Version).string())
                    .col(
                        ColumnDef::new(StudyValueVersions::StartDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudyValueVersions::EndDate).timestamp())
                    .col(ColumnDef::new(StudyValueVersions::Author).string().not_null())
                    .col(ColumnDef::new(StudyValueVersions::ChangeDescription).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_value_versions_study_root_id")
                            .from(StudyValueVersions::Table, StudyValueVersions::StudyRootId)
                            .to(StudyRoots::Table, StudyRoots::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_value_versions_study_value_id")
                            .from(StudyValueVersions::Table, StudyValueVersions::StudyValueId)
                            .to(StudyValues::Table, StudyValues::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // before_selection_id is left without a foreign key; study_selections is
        // created later and itself references this table.
        manager
            .create_table(
                Table::create()
                    .table(StudyActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyActions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudyActions::StudyRootId).integer().not_null())
                    .col(ColumnDef::new(StudyActions::ActionType).string().not_null())
                    .col(ColumnDef::new(StudyActions::Date).timestamp().not_null())
                    .col(ColumnDef::new(StudyActions::UserInitials).string().not_null())
                    .col(ColumnDef::new(StudyActions::BeforeSelectionId).integer())
                    .col(ColumnDef::new(StudyActions::AfterStudyValueId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_actions_study_root_id")
                            .from(StudyActions::Table, StudyActions::StudyRootId)
                            .to(StudyRoots::Table, StudyRoots::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UidCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UidCounters::Label)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UidCounters::Counter)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_values_study_root_id")
                    .table(StudyValues::Table)
                    .col(StudyValues::StudyRootId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_value_versions_root")
                    .table(StudyValueVersions::Table)
                    .col(StudyValueVersions::StudyRootId)
                    .col(StudyValueVersions::Version)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_actions_study_root_id")
                    .table(StudyActions::Table)
                    .col(StudyActions::StudyRootId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_actions_before_selection_id")
                    .table(StudyActions::Table)
                    .col(StudyActions::BeforeSelectionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UidCounters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudyActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudyValueVersions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudyValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudyRoots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    ProjectNumber,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudyRoots {
    Table,
    Id,
    Uid,
    WriteLock,
    WriteLockGeneration,
    LatestValueId,
    LatestLockedValueId,
    LatestReleasedValueId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudyValues {
    Table,
    Id,
    StudyRootId,
    ProjectId,
    StudyNumber,
    StudyAcronym,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudyValueVersions {
    Table,
    Id,
    StudyRootId,
    StudyValueId,
    Status,
    Version,
    StartDate,
    EndDate,
    Author,
    ChangeDescription,
}

#[derive(DeriveIden)]
enum StudyActions {
    Table,
    Id,
    StudyRootId,
    ActionType,
    Date,
    UserInitials,
    BeforeSelectionId,
    AfterStudyValueId,
}

#[derive(DeriveIden)]
enum UidCounters {
    Table,
    Label,
    Counter,
}
