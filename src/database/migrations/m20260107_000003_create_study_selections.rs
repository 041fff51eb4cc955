use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Selection rows are append-only. after_action_id is the action that produced the row.
        manager
            .create_table(
                Table::create()
                    .table(StudySelections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudySelections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudySelections::Uid).string().not_null())
                    .col(ColumnDef::new(StudySelections::Kind).string().not_null())
                    .col(
                        ColumnDef::new(StudySelections::SelectionOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelections::AcceptedVersion)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(StudySelections::Fields).json().not_null())
                    .col(
                        ColumnDef::new(StudySelections::AfterActionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelections::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_selections_after_action_id")
                            .from(StudySelections::Table, StudySelections::AfterActionId)
                            .to(StudyActions::Table, StudyActions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudyValueSelections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudyValueSelections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudyValueSelections::StudyValueId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudyValueSelections::StudySelectionId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_value_selections_study_value_id")
                            .from(StudyValueSelections::Table, StudyValueSelections::StudyValueId)
                            .to(StudyValues::Table, StudyValues::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_value_selections_study_selection_id")
                            .from(
                                StudyValueSelections::Table,
                                StudyValueSelections::StudySelectionId,
                            )
                            .to(StudySelections::Table, StudySelections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudySelectionConcepts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudySelectionConcepts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionConcepts::StudySelectionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionConcepts::Relationship)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionConcepts::ConceptValueId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_selection_concepts_study_selection_id")
                            .from(
                                StudySelectionConcepts::Table,
                                StudySelectionConcepts::StudySelectionId,
                            )
                            .to(StudySelections::Table, StudySelections::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_selection_concepts_concept_value_id")
                            .from(
                                StudySelectionConcepts::Table,
                                StudySelectionConcepts::ConceptValueId,
                            )
                            .to(ConceptValues::Table, ConceptValues::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudySelectionTerms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudySelectionTerms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionTerms::StudySelectionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionTerms::Relationship)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudySelectionTerms::CtTermRootId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_selection_terms_study_selection_id")
                            .from(
                                StudySelectionTerms::Table,
                                StudySelectionTerms::StudySelectionId,
                            )
                            .to(StudySelections::Table, StudySelections::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_selection_terms_ct_term_root_id")
                            .from(StudySelectionTerms::Table, StudySelectionTerms::CtTermRootId)
                            .to(CtTermRoots::Table, CtTermRoots::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_selections_uid")
                    .table(StudySelections::Table)
                    .col(StudySelections::Uid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_selections_after_action_id")
                    .table(StudySelections::Table)
                    .col(StudySelections::AfterActionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_study_value_selections_value_selection")
                    .table(StudyValueSelections::Table)
                    .col(StudyValueSelections::StudyValueId)
                    .col(StudyValueSelections::StudySelectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_selection_concepts_selection")
                    .table(StudySelectionConcepts::Table)
                    .col(StudySelectionConcepts::StudySelectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_study_selection_terms_selection")
                    .table(StudySelectionTerms::Table)
                    .col(StudySelectionTerms::StudySelectionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudySelectionTerms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudySelectionConcepts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudyValueSelections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudySelections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StudySelections {
    Table,
    Id,
    Uid,
    Kind,
    SelectionOrder,
    AcceptedVersion,
    Fields,
    AfterActionId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StudyValueSelections {
    Table,
    Id,
    StudyValueId,
    StudySelectionId,
}

#[derive(DeriveIden)]
enum StudySelectionConcepts {
    Table,
    Id,
    StudySelectionId,
    Relationship,
    ConceptValueId,
}

#[derive(DeriveIden)]
enum StudySelectionTerms {
    Table,
    Id,
    StudySelectionId,
    Relationship,
    CtTermRootId,
}

#[derive(DeriveIden)]
enum StudyActions {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum StudyValues {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ConceptValues {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CtTermRoots {
    Table,
    Id,
}
